use serde::{Deserialize, Serialize};

/// Body of a Ladok result registration. Wire field names follow the
/// gateway's Swedish vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationPayload {
    pub personnummer: String,
    pub kurskod: String,
    #[serde(rename = "modul")]
    pub modulkod: String,
    pub datum: String,
    pub betyg: String,
}

/// What Ladok answers to a registration attempt. The status vocabulary is
/// the server's; the orchestrator classifies it rather than trusting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResult {
    #[serde(rename = "resultatId", default)]
    pub resultat_id: Option<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// A course module as listed by Epok.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub modulkod: String,
    #[serde(rename = "namn")]
    pub name: String,
    #[serde(rename = "aktiv")]
    pub active: bool,
}
