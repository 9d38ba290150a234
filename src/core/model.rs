// YearScope - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers. The serde
// field names are the wire format of the published result files and
// must not change.

use crate::util::constants;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =============================================================================
// Evaluation Record
// =============================================================================

/// One model's answer to one historical-event question.
///
/// Created upstream by the evaluation run; read-only here. This is the
/// unit that flows through filtering, aggregation, comparison and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Identifier of the model that produced the answer (e.g. "gemma3:4b").
    pub model_name: String,

    /// The historical event the question was about.
    pub event: Event,

    /// Question text posed to the model.
    pub question: String,

    /// The model's raw textual answer.
    pub model_response: String,

    /// Year extracted from `model_response`. `None` when the upstream
    /// extractor found no year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_year: Option<i32>,

    /// Whether `extracted_year` equals the ground-truth year.
    pub is_correct: bool,

    /// Model confidence in [0.0, 1.0].
    pub confidence_score: f64,
}

/// A historical claim with its ground-truth year and categorical attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub text: String,

    /// Ground-truth year.
    pub year: i32,

    /// Free-form date string as published (not parsed).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,

    pub primary_category: PrimaryCategory,
    pub violence_level: ViolenceLevel,
    pub scale: Scale,
    pub human_impact: HumanImpact,
    pub continental: Continent,
    pub cultural_region: CulturalRegion,
    pub development_status: DevelopmentStatus,
    pub colonial_status: ColonialStatus,
    pub century: Century,
    pub decade: Decade,
    pub seasonal: Season,
    pub historical_period: HistoricalPeriod,
}

// =============================================================================
// Closed attribute enumerations
// =============================================================================

/// Declares a closed enumeration whose wire form is its display label.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Returns all variants in catalog order.
            pub fn all() -> &'static [$name] {
                &[$($name::$variant,)+]
            }

            /// The label used in the data files and in filter selections.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse a label back into a variant (exact, case-sensitive).
            pub fn from_label(value: &str) -> Option<Self> {
                Self::all().iter().copied().find(|v| v.label() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_label(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "'{raw}' is not a valid {}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

label_enum! {
    /// Primary subject area of an event.
    PrimaryCategory {
        MilitaryWarfare => "Military & Warfare",
        PoliticsGovernment => "Politics & Government",
        ScienceTechnology => "Science & Technology",
        ArtsCulture => "Arts & Culture",
        DisastersAccidents => "Disasters & Accidents",
        SportsRecreation => "Sports & Recreation",
        EconomicsBusiness => "Economics & Business",
        ReligionPhilosophy => "Religion & Philosophy",
    }
}

label_enum! {
    ViolenceLevel {
        Peaceful => "peaceful",
        Violent => "violent",
        Catastrophic => "catastrophic",
    }
}

label_enum! {
    Scale {
        Local => "local",
        National => "national",
        International => "international",
        Global => "global",
    }
}

label_enum! {
    HumanImpact {
        Individual => "individual",
        SmallGroup => "small group",
        MassPopulation => "mass population",
    }
}

label_enum! {
    /// Continent where the event took place (`continental` on the wire).
    Continent {
        NorthAmerica => "North America",
        SouthAmerica => "South America",
        Europe => "Europe",
        Asia => "Asia",
        Africa => "Africa",
        Oceania => "Oceania",
    }
}

label_enum! {
    CulturalRegion {
        Western => "Western",
        Eastern => "Eastern",
        MiddleEastern => "Middle Eastern",
        African => "African",
        LatinAmerican => "Latin American",
    }
}

label_enum! {
    DevelopmentStatus {
        Developed => "developed",
        Developing => "developing",
    }
}

label_enum! {
    ColonialStatus {
        Colonial => "colonial",
        Independent => "independent",
    }
}

label_enum! {
    Century {
        Pre1500 => "Pre-1500",
        From1500To1699 => "1500-1699",
        From1700To1799 => "1700-1799",
        From1800To1899 => "1800-1899",
        From1900To1999 => "1900-1999",
        From2000 => "2000+",
    }
}

label_enum! {
    /// Season of the event (`seasonal` on the wire).
    Season {
        Winter => "Winter",
        Spring => "Spring",
        Summer => "Summer",
        Fall => "Fall",
    }
}

label_enum! {
    HistoricalPeriod {
        Ancient => "Ancient",
        Medieval => "Medieval",
        Renaissance => "Renaissance",
        Industrial => "Industrial",
        Modern => "Modern",
        Contemporary => "Contemporary",
    }
}

// =============================================================================
// Decade
// =============================================================================

/// A decade label such as "1850s", restricted to
/// `FIRST_DECADE..=LAST_DECADE` in steps of ten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Decade {
    start: u16,
    label: String,
}

impl Decade {
    /// Build a decade from its first year. Returns `None` for years that are
    /// not a multiple of ten or fall outside the supported range.
    pub fn from_start(start: u16) -> Option<Self> {
        if start % 10 != 0 || !(constants::FIRST_DECADE..=constants::LAST_DECADE).contains(&start)
        {
            return None;
        }
        Some(Self {
            start,
            label: format!("{start}s"),
        })
    }

    /// Parse a label of the form `"1850s"`.
    pub fn from_label(value: &str) -> Option<Self> {
        let digits = value.strip_suffix('s')?;
        if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::from_start(digits.parse().ok()?)
    }

    /// Every supported decade, oldest first.
    pub fn all() -> Vec<Decade> {
        (constants::FIRST_DECADE..=constants::LAST_DECADE)
            .step_by(10)
            .filter_map(Self::from_start)
            .collect()
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for Decade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Serialize for Decade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

impl<'de> Deserialize<'de> for Decade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not a valid Decade")))
    }
}

// =============================================================================
// Attribute
// =============================================================================

/// One filterable attribute of an event.
///
/// Filter groups are configured as lists of these, so a group can only
/// reference attributes the data model actually has. The key is the
/// attribute's field name on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    PrimaryCategory,
    ViolenceLevel,
    Scale,
    HumanImpact,
    Continental,
    CulturalRegion,
    DevelopmentStatus,
    ColonialStatus,
    Century,
    Decade,
    Seasonal,
    HistoricalPeriod,
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl Attribute {
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::PrimaryCategory,
            Attribute::ViolenceLevel,
            Attribute::Scale,
            Attribute::HumanImpact,
            Attribute::Continental,
            Attribute::CulturalRegion,
            Attribute::DevelopmentStatus,
            Attribute::ColonialStatus,
            Attribute::Century,
            Attribute::Decade,
            Attribute::Seasonal,
            Attribute::HistoricalPeriod,
        ]
    }

    /// Field name used in the data files and the catalog TOML.
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::PrimaryCategory => "primary_category",
            Attribute::ViolenceLevel => "violence_level",
            Attribute::Scale => "scale",
            Attribute::HumanImpact => "human_impact",
            Attribute::Continental => "continental",
            Attribute::CulturalRegion => "cultural_region",
            Attribute::DevelopmentStatus => "development_status",
            Attribute::ColonialStatus => "colonial_status",
            Attribute::Century => "century",
            Attribute::Decade => "decade",
            Attribute::Seasonal => "seasonal",
            Attribute::HistoricalPeriod => "historical_period",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|a| a.key() == key)
    }

    /// The record's value for this attribute, as its label.
    pub fn value_of<'a>(&self, record: &'a EvaluationRecord) -> &'a str {
        let event = &record.event;
        match self {
            Attribute::PrimaryCategory => event.primary_category.label(),
            Attribute::ViolenceLevel => event.violence_level.label(),
            Attribute::Scale => event.scale.label(),
            Attribute::HumanImpact => event.human_impact.label(),
            Attribute::Continental => event.continental.label(),
            Attribute::CulturalRegion => event.cultural_region.label(),
            Attribute::DevelopmentStatus => event.development_status.label(),
            Attribute::ColonialStatus => event.colonial_status.label(),
            Attribute::Century => event.century.label(),
            Attribute::Decade => event.decade.label(),
            Attribute::Seasonal => event.seasonal.label(),
            Attribute::HistoricalPeriod => event.historical_period.label(),
        }
    }

    /// Whether `value` belongs to this attribute's enumeration.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Attribute::PrimaryCategory => PrimaryCategory::from_label(value).is_some(),
            Attribute::ViolenceLevel => ViolenceLevel::from_label(value).is_some(),
            Attribute::Scale => Scale::from_label(value).is_some(),
            Attribute::HumanImpact => HumanImpact::from_label(value).is_some(),
            Attribute::Continental => Continent::from_label(value).is_some(),
            Attribute::CulturalRegion => CulturalRegion::from_label(value).is_some(),
            Attribute::DevelopmentStatus => DevelopmentStatus::from_label(value).is_some(),
            Attribute::ColonialStatus => ColonialStatus::from_label(value).is_some(),
            Attribute::Century => Century::from_label(value).is_some(),
            Attribute::Decade => Decade::from_label(value).is_some(),
            Attribute::Seasonal => Season::from_label(value).is_some(),
            Attribute::HistoricalPeriod => HistoricalPeriod::from_label(value).is_some(),
        }
    }

    /// Every value in this attribute's enumeration, in declaration order.
    pub fn values(&self) -> Vec<String> {
        fn labels<T>(all: &[T], label: fn(&T) -> &'static str) -> Vec<String> {
            all.iter().map(|v| label(v).to_string()).collect()
        }
        match self {
            Attribute::PrimaryCategory => labels(PrimaryCategory::all(), PrimaryCategory::label),
            Attribute::ViolenceLevel => labels(ViolenceLevel::all(), ViolenceLevel::label),
            Attribute::Scale => labels(Scale::all(), Scale::label),
            Attribute::HumanImpact => labels(HumanImpact::all(), HumanImpact::label),
            Attribute::Continental => labels(Continent::all(), Continent::label),
            Attribute::CulturalRegion => labels(CulturalRegion::all(), CulturalRegion::label),
            Attribute::DevelopmentStatus => {
                labels(DevelopmentStatus::all(), DevelopmentStatus::label)
            }
            Attribute::ColonialStatus => labels(ColonialStatus::all(), ColonialStatus::label),
            Attribute::Century => labels(Century::all(), Century::label),
            Attribute::Decade => Decade::all()
                .iter()
                .map(|d| d.label().to_string())
                .collect(),
            Attribute::Seasonal => labels(Season::all(), Season::label),
            Attribute::HistoricalPeriod => {
                labels(HistoricalPeriod::all(), HistoricalPeriod::label)
            }
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// Test fixtures
// =============================================================================

/// Record builders shared by unit tests across the core layer.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A fully-populated record with neutral attribute values.
    pub fn record(category: PrimaryCategory, correct: bool, confidence: f64) -> EvaluationRecord {
        EvaluationRecord {
            model_name: "gemma3:1b".to_string(),
            event: Event {
                text: "The Treaty of Westphalia is signed".to_string(),
                year: 1648,
                date: "1648-10-24".to_string(),
                primary_category: category,
                violence_level: ViolenceLevel::Peaceful,
                scale: Scale::International,
                human_impact: HumanImpact::MassPopulation,
                continental: Continent::Europe,
                cultural_region: CulturalRegion::Western,
                development_status: DevelopmentStatus::Developed,
                colonial_status: ColonialStatus::Independent,
                century: Century::From1500To1699,
                decade: Decade::from_start(1640).unwrap(),
                seasonal: Season::Fall,
                historical_period: HistoricalPeriod::Renaissance,
            },
            question: "In what year did this happen?".to_string(),
            model_response: "1648".to_string(),
            extracted_year: Some(if correct { 1648 } else { 1650 }),
            is_correct: correct,
            confidence_score: confidence,
        }
    }
}
