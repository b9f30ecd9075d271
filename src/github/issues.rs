use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Value of the `state` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of the issue listing response. Only the exported fields are read.
#[derive(Deserialize, Debug, PartialEq)]
pub struct IssueRecord {
    pub url: String,
    pub title: String,
    pub state: String,
    pub created_at: String,
    pub labels: Vec<LabelRecord>,
    pub comments: u64,
    /// Present when the record is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl IssueRecord {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct LabelRecord {
    pub url: String,
}
