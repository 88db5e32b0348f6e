use serde::Serialize;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Failed,
    Skipped,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Failed => "failed",
            CheckStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub suite: String,
    pub overall: String,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub checks: Vec<CheckItem>,
}

impl VerifyReport {
    pub fn from_checks(suite: &str, checks: Vec<CheckItem>) -> Self {
        let count = |s: CheckStatus| checks.iter().filter(|c| c.status == s).count();
        let (passed, failed, skipped) = (
            count(CheckStatus::Ok),
            count(CheckStatus::Failed),
            count(CheckStatus::Skipped),
        );
        VerifyReport {
            suite: suite.to_string(),
            overall: if failed == 0 { "ok" } else { "needs_attention" }.to_string(),
            passed,
            failed,
            skipped,
            checks,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Serialize)]
pub struct CheckListing {
    pub suite: String,
    pub name: String,
}
