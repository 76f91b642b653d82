use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    Person,
    Location,
    Organisation,
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityLabel::Person => "Person",
            EntityLabel::Location => "Location",
            EntityLabel::Organisation => "Organisation",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntity {
    pub text: String,
    pub label: EntityLabel,
    pub confidence: f64,
}

/// Raw shape the extraction LLM is asked to return; filtered against the
/// confidence floor before becoming a `NamedEntity`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEntity {
    pub text: String,
    pub label: EntityLabel,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct RawEntityResponse {
    #[serde(default)]
    pub entities: Vec<RawEntity>,
}
