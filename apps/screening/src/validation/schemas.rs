//! The three schema tables the screening flow validates AI payloads against.
//!
//! Field order matters: it is the order violations are reported in.

use super::{ElementRule, Field, FieldRule, LengthRule, Schema};

fn field(name: &'static str, rule: FieldRule) -> Field {
    Field { name, rule }
}

fn string_array() -> FieldRule {
    FieldRule::Array {
        length: LengthRule::Any,
        element: Some(ElementRule::String),
    }
}

fn array_of(n: usize) -> FieldRule {
    FieldRule::Array {
        length: LengthRule::Exactly(n),
        element: None,
    }
}

fn array_at_least(n: usize) -> FieldRule {
    FieldRule::Array {
        length: LengthRule::AtLeast(n),
        element: None,
    }
}

/// Shape of a generated job description: company, role, a brief description,
/// and non-empty responsibility and qualification lists.
pub fn job_description_schema() -> Schema {
    Schema(vec![
        field("companyName", FieldRule::String),
        field("role", FieldRule::String),
        field("briefDescription", FieldRule::String),
        field("responsibilities", array_at_least(1)),
        field("qualifications", array_at_least(1)),
    ])
}

/// Shape of a job analysis. The skill, responsibility, and requirement lists
/// are exactly three items each — the analysis prompt asks for exactly three,
/// and the ranking views render exactly three.
pub fn job_analysis_schema() -> Schema {
    Schema(vec![
        field("jobTitle", FieldRule::String),
        field("keyTechnicalSkills", array_of(3)),
        field("keyInterpersonalSkills", array_of(3)),
        field("responsibilities", array_of(3)),
        field("requirements", array_of(3)),
        field("overview", FieldRule::String),
    ])
}

fn skill_block() -> FieldRule {
    FieldRule::Object(Schema(vec![
        field("keySkills", string_array()),
        field("justification", FieldRule::String),
    ]))
}

/// Shape of a candidate analysis.
///
/// `evaluationScores` is deliberately lenient: whatever categories the service
/// returned are each checked for a numeric `score` and a string
/// `justification`, but presence of the five canonical categories is enforced
/// by the score calculator, not here.
pub fn candidate_analysis_schema() -> Schema {
    Schema(vec![
        field("jobTitle", FieldRule::String),
        field(
            "summary",
            FieldRule::Object(Schema(vec![
                field("keySkills", string_array()),
                field("relevantExperience", FieldRule::String),
                field("education", FieldRule::String),
                field("other", string_array()),
            ])),
        ),
        field(
            "jobFit",
            FieldRule::Object(Schema(vec![
                field("technicalSkills", skill_block()),
                field("interpersonalSkills", skill_block()),
            ])),
        ),
        field(
            "strengthsAndWeaknesses",
            FieldRule::Object(Schema(vec![
                field("strengths", string_array()),
                field("areasForImprovement", string_array()),
            ])),
        ),
        field(
            "evaluationScores",
            FieldRule::MapOf(Schema(vec![
                field("score", FieldRule::Number),
                field("justification", FieldRule::String),
            ])),
        ),
        field(
            "recommendations",
            FieldRule::Object(Schema(vec![
                field("candidate", FieldRule::String),
                field("recruiter", FieldRule::String),
            ])),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::{json, Value};

    fn valid_job_description() -> Value {
        json!({
            "companyName": "Acme",
            "role": "Backend Engineer",
            "briefDescription": "Build and run the order platform.",
            "responsibilities": ["Design services", "Review code"],
            "qualifications": ["3+ years Rust"]
        })
    }

    fn valid_job_analysis() -> Value {
        json!({
            "jobTitle": "Backend Engineer",
            "keyTechnicalSkills": ["Rust", "SQL", "Kubernetes"],
            "keyInterpersonalSkills": ["Communication", "Mentoring", "Ownership"],
            "responsibilities": ["Design", "Build", "Operate"],
            "requirements": ["Degree", "Experience", "English"],
            "overview": "Senior backend role on the platform team."
        })
    }

    fn valid_candidate_analysis() -> Value {
        json!({
            "jobTitle": "Backend Engineer",
            "summary": {
                "keySkills": ["Rust", "Postgres"],
                "relevantExperience": "Five years of backend work.",
                "education": "BSc Computer Science",
                "other": ["Open source contributor"]
            },
            "jobFit": {
                "technicalSkills": {
                    "keySkills": ["Rust", "SQL"],
                    "justification": "Strong overlap with the stack."
                },
                "interpersonalSkills": {
                    "keySkills": ["Communication"],
                    "justification": "Led a small team."
                }
            },
            "strengthsAndWeaknesses": {
                "strengths": ["Systems design"],
                "areasForImprovement": ["Frontend exposure"]
            },
            "evaluationScores": {
                "technicalSkills": {"score": 8, "justification": "Solid."},
                "workExperience": {"score": 6, "justification": "Adequate."},
                "culturalFit": {"score": 10, "justification": "Excellent."},
                "education": {"score": 7, "justification": "Relevant degree."},
                "additionalSkills": {"score": 9, "justification": "Broad toolbox."}
            },
            "recommendations": {
                "candidate": "Brush up on frontend basics.",
                "recruiter": "Proceed to technical interview."
            }
        })
    }

    #[test]
    fn test_valid_job_description_passes() {
        let result = validate(&job_description_schema(), &valid_job_description());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_job_description_empty_list_fails() {
        let mut jd = valid_job_description();
        jd["qualifications"] = json!([]);
        let result = validate(&job_description_schema(), &jd);
        assert_eq!(
            result.errors,
            vec!["Invalid length for qualifications: expected at least 1 items, got 0".to_string()]
        );
    }

    #[test]
    fn test_valid_job_analysis_passes() {
        let result = validate(&job_analysis_schema(), &valid_job_analysis());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_job_analysis_two_skills_fails_exact_length() {
        let mut analysis = valid_job_analysis();
        analysis["keyTechnicalSkills"] = json!(["Rust", "SQL"]);
        let result = validate(&job_analysis_schema(), &analysis);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("keyTechnicalSkills"));
        assert!(result.errors[0].contains('3'));
        assert!(result.errors[0].contains('2'));
    }

    #[test]
    fn test_valid_candidate_analysis_passes() {
        let result = validate(&candidate_analysis_schema(), &valid_candidate_analysis());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_candidate_numeric_job_title_fails() {
        let mut analysis = valid_candidate_analysis();
        analysis["jobTitle"] = json!(42);
        let result = validate(&candidate_analysis_schema(), &analysis);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Invalid type for jobTitle: expected string, got number".to_string()]
        );
    }

    #[test]
    fn test_candidate_scores_checked_per_present_category() {
        let mut analysis = valid_candidate_analysis();
        analysis["evaluationScores"]["culturalFit"]["score"] = json!("ten");
        let result = validate(&candidate_analysis_schema(), &analysis);
        assert_eq!(
            result.errors,
            vec![
                "Invalid type for evaluationScores.culturalFit.score: expected number, got string"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_candidate_scores_missing_category_still_passes() {
        // Presence of the canonical five is the score calculator's contract,
        // not the validator's.
        let mut analysis = valid_candidate_analysis();
        analysis["evaluationScores"]
            .as_object_mut()
            .unwrap()
            .remove("education");
        let result = validate(&candidate_analysis_schema(), &analysis);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_candidate_missing_nested_field_reports_dotted_path() {
        let mut analysis = valid_candidate_analysis();
        analysis["summary"].as_object_mut().unwrap().remove("education");
        let result = validate(&candidate_analysis_schema(), &analysis);
        assert_eq!(
            result.errors,
            vec!["Missing property: summary.education".to_string()]
        );
    }

    #[test]
    fn test_candidate_accumulates_across_sections() {
        let mut analysis = valid_candidate_analysis();
        analysis["jobTitle"] = json!(42);
        analysis["recommendations"]["recruiter"] = json!(null);
        let result = validate(&candidate_analysis_schema(), &analysis);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("jobTitle"));
        assert!(result.errors[1].contains("recommendations.recruiter"));
    }
}
