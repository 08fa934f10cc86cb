//! KQL table to Splunk index/sourcetype mapping
//!
//! Every environment ingests Microsoft data differently, so the mapping is
//! seeded with common defaults and overlaid with user entries. Resolution is
//! total: anything unknown lands on the `default` entry.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, TranslateError};

/// Key of the fallback entry
pub const DEFAULT_KEY: &str = "default";

/// Where a table's events live in Splunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub index: String,
    pub sourcetype: Option<String>,
    #[serde(default)]
    pub note: String,
}

impl TableEntry {
    pub fn new(index: &str, sourcetype: Option<&str>, note: &str) -> Self {
        Self {
            index: index.to_string(),
            sourcetype: sourcetype.map(str::to_string),
            note: note.to_string(),
        }
    }
}

static FALLBACK_ENTRY: Lazy<TableEntry> = Lazy::new(|| {
    TableEntry::new(
        "main",
        None,
        "Default fallback - adjust to your environment",
    )
});

static DEFAULT_ENTRIES: Lazy<BTreeMap<String, TableEntry>> = Lazy::new(|| {
    let rows: [(&str, &str, Option<&str>, &str); 26] = [
        // Windows Security & Defender
        (
            "SecurityEvent",
            "windows",
            Some("WinEventLog:Security"),
            "Common for Windows Security events",
        ),
        (
            "DeviceProcessEvents",
            "defender",
            Some("MDE:DeviceProcessEvents"),
            "Microsoft Defender for Endpoint",
        ),
        (
            "DeviceNetworkEvents",
            "defender",
            Some("MDE:DeviceNetworkEvents"),
            "Microsoft Defender for Endpoint",
        ),
        (
            "DeviceFileEvents",
            "defender",
            Some("MDE:DeviceFileEvents"),
            "Microsoft Defender for Endpoint",
        ),
        ("DeviceEvents", "defender", Some("MDE:DeviceEvents"), "Microsoft Defender for Endpoint"),
        (
            "DeviceRegistryEvents",
            "defender",
            Some("MDE:DeviceRegistryEvents"),
            "Microsoft Defender for Endpoint",
        ),
        (
            "DeviceLogonEvents",
            "defender",
            Some("MDE:DeviceLogonEvents"),
            "Microsoft Defender for Endpoint",
        ),
        (
            "DeviceImageLoadEvents",
            "defender",
            Some("MDE:DeviceImageLoadEvents"),
            "Microsoft Defender for Endpoint",
        ),
        // Azure AD / Entra ID
        ("SigninLogs", "azuread", Some("azure:aad:signin"), "Azure AD Sign-in logs"),
        ("AuditLogs", "azuread", Some("azure:aad:audit"), "Azure AD Audit logs"),
        (
            "AADSignInEventsBeta",
            "azuread",
            Some("azure:aad:signin"),
            "Azure AD Sign-in logs (beta)",
        ),
        // Office 365 / Email
        ("EmailEvents", "o365", Some("ms:o365:reporting:messagetrace"), "Office 365 Email events"),
        (
            "EmailUrlInfo",
            "o365",
            Some("ms:o365:reporting:messagetrace"),
            "Office 365 Email URL info",
        ),
        (
            "EmailAttachmentInfo",
            "o365",
            Some("ms:o365:reporting:messagetrace"),
            "Office 365 Email attachments",
        ),
        ("CloudAppEvents", "o365", Some("ms:o365:management"), "Office 365 Cloud App events"),
        ("OfficeActivity", "o365", Some("ms:o365:management"), "Office 365 Activity"),
        // Identity & threat
        ("IdentityInfo", "security", Some("MDI:IdentityInfo"), "Microsoft Defender for Identity"),
        (
            "IdentityLogonEvents",
            "security",
            Some("MDI:IdentityLogonEvents"),
            "Microsoft Defender for Identity",
        ),
        (
            "IdentityQueryEvents",
            "security",
            Some("MDI:IdentityQueryEvents"),
            "Microsoft Defender for Identity",
        ),
        (
            "ThreatIntelligenceIndicator",
            "threatintel",
            Some("ti:indicators"),
            "Threat Intelligence indicators",
        ),
        (
            "SecurityAlert",
            "security",
            Some("security:alerts"),
            "Security alerts from various sources",
        ),
        ("SecurityIncident", "security", Some("security:incidents"), "Security incidents"),
        ("AlertEvidence", "security", Some("security:alert:evidence"), "Security alert evidence"),
        // Azure resources
        ("Resources", "azure", Some("azure:resource:graph"), "Azure Resource Graph"),
        ("ResourceChanges", "azure", Some("azure:resource:changes"), "Azure Resource Changes"),
        (DEFAULT_KEY, "main", None, "Default fallback - adjust to your environment"),
    ];

    rows.into_iter()
        .map(|(table, index, sourcetype, note)| {
            (table.to_string(), TableEntry::new(index, sourcetype, note))
        })
        .collect()
});

static SEARCH_KEYWORDS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    m.insert("SecurityEvent", &["EventCode=4624", "EventID", "Windows Security", "WinEventLog"]);
    m.insert(
        "DeviceProcessEvents",
        &["DeviceName", "ProcessCommandLine", "InitiatingProcessFileName", "DeviceId"],
    );
    m.insert(
        "DeviceNetworkEvents",
        &["DeviceName", "RemoteIP", "RemoteUrl", "InitiatingProcessFileName"],
    );
    m.insert("DeviceFileEvents", &["DeviceName", "FileName", "FolderPath", "SHA256"]);
    m.insert(
        "SigninLogs",
        &["UserPrincipalName", "SignInLogs", "Azure AD", "ConditionalAccessStatus"],
    );
    m.insert("AuditLogs", &["AuditLogs", "OperationName", "InitiatedBy", "Azure AD"]);
    m.insert(
        "EmailEvents",
        &["SenderFromAddress", "RecipientEmailAddress", "Subject", "NetworkMessageId"],
    );
    m.insert("OfficeActivity", &["Office 365", "Operation", "UserId", "Workload"]);
    m.insert(
        "IdentityInfo",
        &["OnPremisesUserPrincipalName", "AccountDisplayName", "IdentityInfo"],
    );
    m
});

/// Outcome of resolving a table name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub entry: &'a TableEntry,
    /// True when no entry matched and `default` was used
    pub fallback: bool,
}

/// Versioned table-to-index mapping
///
/// Values are replaced wholesale by [`TableMapping::merged`]; a translation
/// borrows the mapping for its whole duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapping {
    entries: BTreeMap<String, TableEntry>,
    version: u64,
}

impl Default for TableMapping {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TableMapping {
    /// Mapping seeded with the built-in table defaults
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            entries: DEFAULT_ENTRIES.clone(),
            version: 0,
        }
    }

    /// Mapping holding only `entries`, plus a `default` entry if they lack one
    #[must_use]
    pub fn from_entries(entries: BTreeMap<String, TableEntry>) -> Self {
        let mut entries = entries;
        entries
            .entry(DEFAULT_KEY.to_string())
            .or_insert_with(|| FALLBACK_ENTRY.clone());
        Self { entries, version: 0 }
    }

    /// Read a flat `table -> {index, sourcetype, note}` JSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid mapping.
    pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, TableEntry>> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TranslateError::MappingRead {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides: BTreeMap<String, TableEntry> =
            serde_json::from_str(&contents).map_err(|source| TranslateError::MappingParse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), entries = overrides.len(), "Loaded table mapping overrides");
        Ok(overrides)
    }

    /// Overlay `updates` onto a copy of this mapping
    ///
    /// Keys present in `updates` replace existing entries, all other keys are
    /// kept. The returned mapping has the next version number.
    #[must_use]
    pub fn merged<I>(&self, updates: I) -> Self
    where
        I: IntoIterator<Item = (String, TableEntry)>,
    {
        let mut entries = self.entries.clone();
        entries.extend(updates);
        let merged = Self {
            entries,
            version: self.version + 1,
        };
        debug!(version = merged.version, entries = merged.entries.len(), "Table mapping merged");
        merged
    }

    /// Resolve a table name; never fails
    ///
    /// Tries the exact name, then its lowercase form, then an ASCII
    /// case-insensitive match, then the `default` entry.
    #[must_use]
    pub fn resolve(&self, table: &str) -> Resolution<'_> {
        let found = self
            .entries
            .get_key_value(table)
            .or_else(|| self.entries.get_key_value(table.to_lowercase().as_str()))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(table))
            })
            .filter(|(key, _)| key.as_str() != DEFAULT_KEY);

        match found {
            Some((_, entry)) => Resolution {
                entry,
                fallback: false,
            },
            None => Resolution {
                entry: self.default_entry(),
                fallback: true,
            },
        }
    }

    /// The fallback entry
    #[must_use]
    pub fn default_entry(&self) -> &TableEntry {
        self.entries.get(DEFAULT_KEY).unwrap_or(&FALLBACK_ENTRY)
    }

    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, TableEntry> {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the `default` entry cannot be removed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Search keywords that identify a table's events in raw Splunk data
#[must_use]
pub fn search_keywords(table: &str) -> Vec<&str> {
    SEARCH_KEYWORDS
        .get(table)
        .map_or_else(|| vec![table], |keywords| keywords.to_vec())
}

/// SPL queries that help locate where a table's data lives in Splunk
///
/// With a table name, returns a count-by-index/sourcetype query and a
/// sample-events query built from the table's keywords. Without one, returns
/// generic queries for exploring Azure and Event Hub sourced data.
#[must_use]
pub fn discovery_queries(table: Option<&str>) -> BTreeMap<String, String> {
    let mut queries = BTreeMap::new();

    match table {
        Some(table) => {
            let keywords = search_keywords(table).join(" OR ");
            queries.insert(
                format!("find_{table}"),
                format!(
                    "index=* ({keywords})\n\
                     | stats count by index, sourcetype\n\
                     | sort -count\n\
                     | head 10"
                ),
            );
            queries.insert(
                format!("sample_{table}"),
                format!("index=* ({keywords})\n| head 5\n| table _time, index, sourcetype, _raw"),
            );
        }
        None => {
            queries.insert(
                "all_azure_data".to_string(),
                "index=* (azure OR entra OR microsoft OR defender OR office365)\n\
                 | stats count by index, sourcetype\n\
                 | sort -count"
                    .to_string(),
            );
            queries.insert(
                "all_indexes".to_string(),
                "| eventcount summarize=false index=*\n| dedup index\n| table index".to_string(),
            );
            queries.insert(
                "all_sourcetypes".to_string(),
                "| metadata type=sourcetypes\n| table sourcetype, totalCount, lastTime".to_string(),
            );
            queries.insert(
                "eventhub_data".to_string(),
                "index=* source=*eventhub* OR sourcetype=*eventhub* OR sourcetype=*azure*\n\
                 | stats count by index, sourcetype, source\n\
                 | sort -count"
                    .to_string(),
            );
        }
    }

    queries
}
