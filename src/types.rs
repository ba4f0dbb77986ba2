use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while parsing keys, addresses and time windows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    #[error("Invalid network address: {0}")]
    InvalidAddress(String),

    #[error("Invalid time window: {0}")]
    InvalidTimeWindow(String),
}

/// Ed25519 verifying key identifying a signer
///
/// Only valid curve points are accepted, so two `PublicKey`s are equal
/// exactly when they name the same signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, ParseError> {
        VerifyingKey::from_bytes(&bytes)
            .map_err(|_| ParseError::InvalidKey(hex::encode(bytes)))?;
        Ok(Self(bytes))
    }

    pub fn from_hex(value: &str) -> Result<Self, ParseError> {
        let decoded = hex::decode(value.trim())
            .map_err(|e| ParseError::InvalidKey(format!("{value}: {e}")))?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|_| ParseError::InvalidKey(format!("{value}: expected 32 bytes")))?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl FromStr for PublicKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A well known ledger identity
///
/// Two parties are the same party when they share an owning key; the
/// display name is informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub owning_key: PublicKey,
}

impl Party {
    pub fn new(name: impl Into<String>, owning_key: PublicKey) -> Self {
        Self {
            name: name.into(),
            owning_key,
        }
    }
}

impl PartialEq for Party {
    fn eq(&self, other: &Self) -> bool {
        self.owning_key == other.owning_key
    }
}

impl Eq for Party {}

impl Hash for Party {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owning_key.hash(state);
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Workflow status of an agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccordanceStatus {
    New,
    Approved,
    Rejected,
}

impl AccordanceStatus {
    /// APPROVED and REJECTED are terminal
    pub fn is_final(self) -> bool {
        matches!(self, AccordanceStatus::Approved | AccordanceStatus::Rejected)
    }
}

impl fmt::Display for AccordanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccordanceStatus::New => "NEW",
            AccordanceStatus::Approved => "APPROVED",
            AccordanceStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", label)
    }
}

/// Identifier shared by every version of one linear state
///
/// Equality and ordering use `id` only; `external_id` is a caller supplied
/// label carried along for reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniqueIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub id: Uuid,
}

impl UniqueIdentifier {
    pub fn new(external_id: Option<String>) -> Self {
        Self {
            external_id,
            id: Uuid::new_v4(),
        }
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            external_id: None,
            id,
        }
    }
}

impl Default for UniqueIdentifier {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PartialEq for UniqueIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UniqueIdentifier {}

impl PartialOrd for UniqueIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UniqueIdentifier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for UniqueIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.external_id {
            Some(external) => write!(f, "{}_{}", external, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// One version of a bilateral agreement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccordanceState {
    pub initiating_party: Party,
    pub counter_party: Party,
    pub status: AccordanceStatus,
    pub linear_id: UniqueIdentifier,
}

impl AccordanceState {
    /// A freshly proposed agreement, always in status NEW
    pub fn propose(initiating_party: Party, counter_party: Party) -> Self {
        Self {
            initiating_party,
            counter_party,
            status: AccordanceStatus::New,
            linear_id: UniqueIdentifier::default(),
        }
    }

    pub fn participants(&self) -> [&Party; 2] {
        [&self.initiating_party, &self.counter_party]
    }

    /// Next version of this agreement, identical except for `status`
    pub fn with_status(&self, status: AccordanceStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Validity interval of a transaction
///
/// At least one bound is always present. `from` is inclusive and `until`
/// is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    #[serde(default)]
    from: Option<DateTime<Utc>>,
    #[serde(default)]
    until: Option<DateTime<Utc>>,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = ParseError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        match (raw.from, raw.until) {
            (Some(from), Some(until)) => Self::between(from, until),
            (Some(from), None) => Ok(Self::from_only(from)),
            (None, Some(until)) => Ok(Self::until_only(until)),
            (None, None) => Err(ParseError::InvalidTimeWindow(
                "at least one of from/until is required".to_string(),
            )),
        }
    }
}

impl TimeWindow {
    pub fn from_only(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            until: None,
        }
    }

    pub fn until_only(until: DateTime<Utc>) -> Self {
        Self {
            from: None,
            until: Some(until),
        }
    }

    pub fn between(from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self, ParseError> {
        if from >= until {
            return Err(ParseError::InvalidTimeWindow(format!(
                "from ({from}) must be before until ({until})"
            )));
        }
        Ok(Self {
            from: Some(from),
            until: Some(until),
        })
    }

    /// Window centred on `instant`, `tolerance` wide on each side
    pub fn with_tolerance(instant: DateTime<Utc>, tolerance: Duration) -> Result<Self, ParseError> {
        Self::between(instant - tolerance, instant + tolerance)
    }

    pub fn from_time(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    pub fn until_time(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let after_start = self.from.is_none_or(|from| instant >= from);
        let before_end = self.until.is_none_or(|until| instant < until);
        after_start && before_end
    }
}

/// Command attached to a transaction
///
/// Serialized as its bare name. Names this contract does not know are kept
/// as `Other` so the validator can reject them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommandKind {
    Issue,
    Completed,
    Other(String),
}

impl CommandKind {
    pub fn name(&self) -> &str {
        match self {
            CommandKind::Issue => "Issue",
            CommandKind::Completed => "Completed",
            CommandKind::Other(name) => name,
        }
    }
}

impl From<String> for CommandKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Issue" => CommandKind::Issue,
            "Completed" => CommandKind::Completed,
            _ => CommandKind::Other(value),
        }
    }
}

impl From<CommandKind> for String {
    fn from(kind: CommandKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fully assembled transaction as seen by a contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    #[serde(default)]
    pub inputs: Vec<AccordanceState>,
    #[serde(default)]
    pub outputs: Vec<AccordanceState>,
    #[serde(default)]
    pub commands: Vec<CommandKind>,
    #[serde(default)]
    pub signers: BTreeSet<PublicKey>,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
}

/// Receipt returned to the submitter after validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub contract_id: String,
    pub status: SubmissionStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Accepted,
    Rejected { rule: String, reason: String },
}
