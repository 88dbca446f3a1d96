use serde::{Deserialize, Serialize};

/// Gender marker accepted by the calculation backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    M,
    F,
    X,
}

impl Sex {
    /// Parse the wire value ("m", "f", "x"); anything else falls back to `M`,
    /// matching the form's default radio selection.
    pub fn from_wire(value: &str) -> Sex {
        match value {
            "f" => Sex::F,
            "x" => Sex::X,
            _ => Sex::M,
        }
    }
}

// ── Token endpoints ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Identity persisted client-side alongside the token pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub username: String,
}

// ── Forward calculation: POST /calc_retirement_income ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkBlock {
    pub years: u32,
    pub gross_income: f64,
    pub contribution_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeRequest {
    pub age: u32,
    pub sex: Sex,
    pub work_blocks: Vec<WorkBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeResponse {
    pub actual_retirement_income: f64,
    pub realistic_retirement_income: f64,
}

// ── Reverse calculation: POST /generate_retirement_plan ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub age: u32,
    pub sex: Sex,
    pub expected_retirement_income: f64,
    pub include_sick: bool,
    pub funds: f64,
    pub start_year: i32,
    pub expected_retirement_age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub expected_total_funds: f64,
    pub funds_left_to_collect: f64,
}

// ── Reporting: GET /reports ──

/// One aggregated calculation record. The backend schema is loose, so every
/// field is optional and unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportRow {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub expected_retirement_income: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_serializes_to_lowercase_wire_values() {
        assert_eq!(serde_json::to_string(&Sex::F).unwrap(), "\"f\"");
        assert_eq!(Sex::from_wire("x"), Sex::X);
        assert_eq!(Sex::from_wire("nonsense"), Sex::M);
    }

    #[test]
    fn income_request_matches_backend_schema() {
        let req = IncomeRequest {
            age: 30,
            sex: Sex::M,
            work_blocks: vec![WorkBlock {
                years: 30,
                gross_income: 5000.0,
                contribution_rate: 0.1952,
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["work_blocks"][0]["contribution_rate"], 0.1952);
        assert_eq!(json["sex"], "m");
    }

    #[test]
    fn report_rows_tolerate_sparse_and_unknown_fields() {
        let rows: Vec<ReportRow> =
            serde_json::from_str(r#"[{"age": 41, "extra": true}, {"salary": 7200.5}]"#).unwrap();
        assert_eq!(rows[0].age, Some(41));
        assert!(rows[0].salary.is_none());
        assert_eq!(rows[1].salary, Some(7200.5));
    }
}
