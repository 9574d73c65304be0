use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

pub struct KeywordCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const TOPIC_CATEGORIES: &[KeywordCategory] = &[
    KeywordCategory {
        name: "housing_homelessness",
        keywords: &[
            "homelessness", "homeless", "unhoused", "unsheltered",
            "affordable housing", "low-income housing", "public housing",
            "Section 8", "housing voucher", "rental assistance", "eviction",
            "eviction moratorium", "tenant rights", "rent crisis", "housing crisis",
            "housing insecurity", "transitional housing", "emergency shelter",
            "homeless shelter", "shelter expansion", "encampments",
            "homeless encampment", "Housing First", "HUD", "shelter system",
            "Continuum of Care", "supportive housing", "permanent supportive housing",
            "housing assistance", "housing policy",
        ],
    },
    KeywordCategory {
        name: "criminal_justice",
        keywords: &[
            "criminal justice reform", "Department of Corrections", "DOC",
            "prison", "jail", "mass incarceration", "incarceration",
            "prison overcrowding", "jail reform", "pretrial detention",
            "bail reform", "probation", "parole", "community supervision",
            "recidivism", "reentry programs", "second chance", "expungement",
            "criminal record", "justice reinvestment", "mental health courts",
            "drug courts", "diversion programs", "restorative justice",
            "criminalization of homelessness", "alternatives to incarceration",
            "youth detention", "sentencing reform", "public safety task force",
            "reentry policy",
        ],
    },
    KeywordCategory {
        name: "mental_behavioral_health",
        keywords: &[
            "mental health", "behavioral health", "psychiatric services",
            "psychiatric hospital", "crisis intervention", "crisis response",
            "mental health crisis", "crisis stabilization", "substance abuse",
            "drug addiction", "opioid crisis", "fentanyl crisis", "overdose prevention",
            "recovery services", "treatment programs", "dual diagnosis",
            "co-occurring disorders", "counseling services", "suicide prevention",
            "trauma-informed care", "mental health diversion", "mental health funding",
            "behavioral health task force", "psychiatric beds", "addiction treatment",
            "sober living", "rehabilitation center", "outpatient treatment",
            "inpatient treatment", "mental health policy",
        ],
    },
    KeywordCategory {
        name: "social_services",
        keywords: &[
            "Department of Human Services", "DHS", "SoonerCare",
            "Medicaid expansion", "Medicaid", "disability services",
            "Social Security Disability", "veterans services", "homeless veterans",
            "SNAP", "food stamps", "food insecurity", "public benefits", "TANF",
            "welfare programs", "child welfare", "foster care", "adoption services",
            "domestic violence shelter", "family reunification", "youth homelessness",
            "runaway youth", "safety net programs", "housing assistance",
            "case management", "wraparound services", "coordinated entry",
            "social services funding", "nonprofit services", "faith-based services",
        ],
    },
    KeywordCategory {
        name: "policy_governance",
        keywords: &[
            "housing policy", "housing legislation", "eviction policy", "rent control",
            "zoning reform", "land use policy", "gentrification policy",
            "fair housing act", "HUD regulations", "affordable housing tax credits",
            "Low-Income Housing Tax Credit", "public housing policy",
            "housing voucher policy", "homelessness prevention policy",
            "criminal justice policy", "sentencing reform policy", "bail reform policy",
            "probation reform", "parole reform", "reentry policy",
            "restorative justice policy", "mental health policy",
            "behavioral health policy", "addiction policy", "Medicaid policy",
            "Medicaid expansion", "SNAP policy", "TANF policy",
            "social safety net policy", "funding allocation policy",
        ],
    },
];

pub const LOCATIONS: &[&str] = &[
    "oklahoma", "okc", "tulsa", "norman", "broken arrow", "lawton", "edmond",
    "moore", "midwest city", "enid", "stillwater", "muskogee",
    "north texas", "dallas", "fort worth", "arlington", "plano", "garland",
    "irving", "frisco", "mckinney", "grand prairie", "denton", "richardson",
    "lewisville", "wichita falls", "texoma", "sherman", "denison",
];

/// Lower-cased phrases the relevance filter matches against.
///
/// Topic categories are flattened into one list: a match never reports which
/// category it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    topics: Vec<String>,
    locations: Vec<String>,
}

impl Vocabulary {
    pub fn new<T, L>(topics: T, locations: L) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        Vocabulary { topics: normalize(topics), locations: normalize(locations) }
    }

    pub fn builtin() -> Self {
        let mut topics = Vec::new();
        for c in TOPIC_CATEGORIES {
            debug!(category = c.name, keywords = c.keywords.len(), "topic category");
            topics.extend(c.keywords.iter().copied());
        }
        Self::new(topics, LOCATIONS.iter().copied())
    }

    /// Load `{ "topics": { "<category>": [..] }, "locations": [..] }`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read keywords file {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parse keywords file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(raw)?;
        let topics = file.topics.into_values().flatten();
        Ok(Self::new(topics, file.locations))
    }

    pub fn topics(&self) -> &[String] { &self.topics }
    pub fn locations(&self) -> &[String] { &self.locations }
}

#[derive(Deserialize)]
struct VocabularyFile {
    topics: BTreeMap<String, Vec<String>>,
    locations: Vec<String>,
}

fn normalize<I>(phrases: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    phrases
        .into_iter()
        .map(|p| p.as_ref().to_lowercase())
        .filter(|p| !p.is_empty() && seen.insert(p.clone()))
        .collect()
}

static ACTIVE: OnceLock<Vocabulary> = OnceLock::new();

/// Vocabulary used by the running process. Falls back to the built-in tables
/// when nothing was installed at startup.
pub fn active() -> &'static Vocabulary {
    ACTIVE.get_or_init(Vocabulary::builtin)
}

/// Install the vocabulary from `RFEED_KEYWORDS_FILE` if set. Must run before
/// the first call to `active()`; returns false if a vocabulary was already set.
pub fn load_from_env() -> Result<bool> {
    let Ok(path) = std::env::var("RFEED_KEYWORDS_FILE") else { return Ok(false) };
    let vocab = Vocabulary::from_json_file(Path::new(&path))?;
    Ok(ACTIVE.set(vocab).is_ok())
}
