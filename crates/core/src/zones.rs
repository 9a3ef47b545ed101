//! Anatomical zone knowledge base.
//!
//! Maps fine-grained anatomical micro-zones to red-flag tags, a triage level,
//! a recommended specialty, and the consultation modes that are clinically
//! safe for that zone. The mapping is held as declarative data (a static
//! table keyed by zone) rather than branching code, so adding a zone is a
//! table edit and the completeness and safety invariants can be asserted in
//! tests.
//!
//! `assess` is a total, pure function: the same zone identifier always
//! produces the same assessment, and an unrecognised identifier resolves to a
//! documented conservative default instead of an error.

use crate::ConsultationMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Coarse body regions used for specialty routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyRegion {
    Abdomen,
    Chest,
    Back,
    Head,
    Extremity,
}

/// Medical specialties the engine can route referrals to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialty {
    Cardiology,
    Gastroenterology,
    Orthopedics,
    Neurology,
    GeneralMedicine,
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Specialty::Cardiology => "cardiology",
            Specialty::Gastroenterology => "gastroenterology",
            Specialty::Orthopedics => "orthopedics",
            Specialty::Neurology => "neurology",
            Specialty::GeneralMedicine => "general medicine",
        };
        write!(f, "{name}")
    }
}

/// Triage level derived from the zone rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageLevel {
    Routine,
    Urgent,
    Emergency,
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriageLevel::Routine => "ROUTINE",
            TriageLevel::Urgent => "URGENT",
            TriageLevel::Emergency => "EMERGENCY",
        };
        write!(f, "{name}")
    }
}

/// Red-flag tags associated with potentially serious underlying pathology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedFlag {
    CardiacPattern,
    AorticDissectionRisk,
    AppendicitisPattern,
    EctopicPregnancyRisk,
    BiliaryPattern,
    PancreaticPattern,
    RenalColicPattern,
    CaudaEquinaSyndromeRisk,
    ThunderclapHeadacheRisk,
    TemporalArteritisRisk,
    DeepVeinThrombosisRisk,
}

impl RedFlag {
    /// Canonical wire identifier for this flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RedFlag::CardiacPattern => "CARDIAC_PATTERN",
            RedFlag::AorticDissectionRisk => "AORTIC_DISSECTION_RISK",
            RedFlag::AppendicitisPattern => "APPENDICITIS_PATTERN",
            RedFlag::EctopicPregnancyRisk => "ECTOPIC_PREGNANCY_RISK",
            RedFlag::BiliaryPattern => "BILIARY_PATTERN",
            RedFlag::PancreaticPattern => "PANCREATIC_PATTERN",
            RedFlag::RenalColicPattern => "RENAL_COLIC_PATTERN",
            RedFlag::CaudaEquinaSyndromeRisk => "CAUDA_EQUINA_SYNDROME_RISK",
            RedFlag::ThunderclapHeadacheRisk => "THUNDERCLAP_HEADACHE_RISK",
            RedFlag::TemporalArteritisRisk => "TEMPORAL_ARTERITIS_RISK",
            RedFlag::DeepVeinThrombosisRisk => "DEEP_VEIN_THROMBOSIS_RISK",
        }
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Anatomical micro-zones selectable in the intake stepper.
///
/// The abdomen follows the 9-quadrant model; the chest is subdivided with
/// cardiac territories in mind; the back follows spinal segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    // Abdomen, 9-quadrant model
    RightHypochondriac,
    Epigastric,
    LeftHypochondriac,
    RightFlank,
    Umbilical,
    LeftFlank,
    RightLowerQuadrant,
    Suprapubic,
    LeftLowerQuadrant,
    // Chest
    LeftPrecordial,
    Retrosternal,
    RightChestWall,
    LeftAxillary,
    // Back, spine-aligned
    CervicalSpine,
    ThoracicSpine,
    LumbarSpine,
    Sacrococcygeal,
    // Head
    FrontalHead,
    TemporalHead,
    OccipitalHead,
    WholeHead,
    // Extremities
    Shoulder,
    Hip,
    Knee,
    Calf,
}

impl Zone {
    /// All declared zones, used for parsing and table completeness checks.
    pub const ALL: [Zone; 25] = [
        Zone::RightHypochondriac,
        Zone::Epigastric,
        Zone::LeftHypochondriac,
        Zone::RightFlank,
        Zone::Umbilical,
        Zone::LeftFlank,
        Zone::RightLowerQuadrant,
        Zone::Suprapubic,
        Zone::LeftLowerQuadrant,
        Zone::LeftPrecordial,
        Zone::Retrosternal,
        Zone::RightChestWall,
        Zone::LeftAxillary,
        Zone::CervicalSpine,
        Zone::ThoracicSpine,
        Zone::LumbarSpine,
        Zone::Sacrococcygeal,
        Zone::FrontalHead,
        Zone::TemporalHead,
        Zone::OccipitalHead,
        Zone::WholeHead,
        Zone::Shoulder,
        Zone::Hip,
        Zone::Knee,
        Zone::Calf,
    ];

    /// Canonical wire identifier for this zone.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::RightHypochondriac => "RIGHT_HYPOCHONDRIAC",
            Zone::Epigastric => "EPIGASTRIC",
            Zone::LeftHypochondriac => "LEFT_HYPOCHONDRIAC",
            Zone::RightFlank => "RIGHT_FLANK",
            Zone::Umbilical => "UMBILICAL",
            Zone::LeftFlank => "LEFT_FLANK",
            Zone::RightLowerQuadrant => "RIGHT_LOWER_QUADRANT",
            Zone::Suprapubic => "SUPRAPUBIC",
            Zone::LeftLowerQuadrant => "LEFT_LOWER_QUADRANT",
            Zone::LeftPrecordial => "LEFT_PRECORDIAL",
            Zone::Retrosternal => "RETROSTERNAL",
            Zone::RightChestWall => "RIGHT_CHEST_WALL",
            Zone::LeftAxillary => "LEFT_AXILLARY",
            Zone::CervicalSpine => "CERVICAL_SPINE",
            Zone::ThoracicSpine => "THORACIC_SPINE",
            Zone::LumbarSpine => "LUMBAR_SPINE",
            Zone::Sacrococcygeal => "SACROCOCCYGEAL",
            Zone::FrontalHead => "FRONTAL_HEAD",
            Zone::TemporalHead => "TEMPORAL_HEAD",
            Zone::OccipitalHead => "OCCIPITAL_HEAD",
            Zone::WholeHead => "WHOLE_HEAD",
            Zone::Shoulder => "SHOULDER",
            Zone::Hip => "HIP",
            Zone::Knee => "KNEE",
            Zone::Calf => "CALF",
        }
    }

    /// Parses a zone identifier, case-insensitively.
    ///
    /// Returns `None` for identifiers outside the declared set; callers are
    /// expected to fall back to the default assessment rather than error.
    pub fn parse(zone_id: &str) -> Option<Zone> {
        let wanted = zone_id.trim().to_ascii_uppercase();
        Zone::ALL.iter().copied().find(|z| z.as_str() == wanted)
    }

    /// The coarse body region this zone belongs to.
    pub fn region(&self) -> BodyRegion {
        match self {
            Zone::RightHypochondriac
            | Zone::Epigastric
            | Zone::LeftHypochondriac
            | Zone::RightFlank
            | Zone::Umbilical
            | Zone::LeftFlank
            | Zone::RightLowerQuadrant
            | Zone::Suprapubic
            | Zone::LeftLowerQuadrant => BodyRegion::Abdomen,
            Zone::LeftPrecordial | Zone::Retrosternal | Zone::RightChestWall | Zone::LeftAxillary => {
                BodyRegion::Chest
            }
            Zone::CervicalSpine | Zone::ThoracicSpine | Zone::LumbarSpine | Zone::Sacrococcygeal => {
                BodyRegion::Back
            }
            Zone::FrontalHead | Zone::TemporalHead | Zone::OccipitalHead | Zone::WholeHead => {
                BodyRegion::Head
            }
            Zone::Shoulder | Zone::Hip | Zone::Knee | Zone::Calf => BodyRegion::Extremity,
        }
    }
}

/// Immutable assessment derived purely from a zone identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssessment {
    /// Canonical identifier of the assessed zone, or the caller's identifier
    /// verbatim when it was not recognised.
    pub zone_id: String,
    /// Red-flag tags associated with the zone, in table order.
    pub red_flags: Vec<RedFlag>,
    /// Triage level chosen by the zone rule table.
    pub triage_level: TriageLevel,
    /// Specialty the case should be routed to.
    pub specialty: Specialty,
    /// Consultation modes that are clinically safe for this zone.
    pub allowed_modes: Vec<ConsultationMode>,
    /// Human-readable description of the clinical pattern this zone encodes.
    pub clinical_pattern: String,
}

/// Static per-zone knowledge: red flags and the pattern description.
struct ZoneProfile {
    red_flags: &'static [RedFlag],
    clinical_pattern: &'static str,
}

/// Zones whose presentation alone warrants emergency triage.
const EMERGENCY_ZONES: &[Zone] = &[Zone::LeftPrecordial, Zone::Retrosternal, Zone::WholeHead];

/// Zones warranting urgent (same-day) assessment.
const URGENT_ZONES: &[Zone] = &[
    Zone::RightLowerQuadrant,
    Zone::Epigastric,
    Zone::RightHypochondriac,
    Zone::CervicalSpine,
    Zone::TemporalHead,
    Zone::Calf,
];

/// Red flags that force emergency triage regardless of the zone lists.
const CRITICAL_FLAGS: &[RedFlag] = &[
    RedFlag::CardiacPattern,
    RedFlag::CaudaEquinaSyndromeRisk,
    RedFlag::ThunderclapHeadacheRisk,
];

/// Zones where a remote consultation is never offered.
const ONLINE_EXCLUDED_ZONES: &[Zone] = &[
    Zone::LeftPrecordial,
    Zone::Retrosternal,
    Zone::RightLowerQuadrant,
    Zone::WholeHead,
    Zone::LumbarSpine,
];

static ZONE_TABLE: LazyLock<HashMap<Zone, ZoneProfile>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    let mut insert = |zone: Zone, red_flags: &'static [RedFlag], clinical_pattern: &'static str| {
        table.insert(
            zone,
            ZoneProfile {
                red_flags,
                clinical_pattern,
            },
        );
    };

    // Abdomen, 9-quadrant model
    insert(
        Zone::RightHypochondriac,
        &[RedFlag::BiliaryPattern],
        "Right upper abdominal pain, biliary colic and cholecystitis territory",
    );
    insert(
        Zone::Epigastric,
        &[RedFlag::PancreaticPattern],
        "Epigastric pain, peptic and pancreatic territory",
    );
    insert(
        Zone::LeftHypochondriac,
        &[],
        "Left upper abdominal pain, splenic and gastric territory",
    );
    insert(
        Zone::RightFlank,
        &[RedFlag::RenalColicPattern],
        "Right flank pain radiating to the groin, renal colic territory",
    );
    insert(Zone::Umbilical, &[], "Periumbilical pain, early visceral presentation");
    insert(
        Zone::LeftFlank,
        &[RedFlag::RenalColicPattern],
        "Left flank pain radiating to the groin, renal colic territory",
    );
    insert(
        Zone::RightLowerQuadrant,
        &[RedFlag::AppendicitisPattern, RedFlag::EctopicPregnancyRisk],
        "Right iliac fossa pain, appendicitis territory requiring in-person examination",
    );
    insert(Zone::Suprapubic, &[], "Suprapubic pain, urinary and pelvic territory");
    insert(Zone::LeftLowerQuadrant, &[], "Left iliac fossa pain, diverticular territory");

    // Chest
    insert(
        Zone::LeftPrecordial,
        &[RedFlag::CardiacPattern],
        "Left precordial chest pain, classic anginal territory",
    );
    insert(
        Zone::Retrosternal,
        &[RedFlag::CardiacPattern, RedFlag::AorticDissectionRisk],
        "Central crushing or tearing chest pain, cardiac and aortic territory",
    );
    insert(
        Zone::RightChestWall,
        &[],
        "Right chest wall pain, musculoskeletal and pleuritic territory",
    );
    insert(Zone::LeftAxillary, &[], "Left axillary pain, chest wall territory");

    // Back, spine-aligned
    insert(Zone::CervicalSpine, &[], "Neck pain, cervical radiculopathy territory");
    insert(Zone::ThoracicSpine, &[], "Mid-back pain, mechanical thoracic territory");
    insert(
        Zone::LumbarSpine,
        &[RedFlag::CaudaEquinaSyndromeRisk],
        "Low back pain; saddle anaesthesia or sphincter disturbance must be excluded in person",
    );
    insert(Zone::Sacrococcygeal, &[], "Sacral and coccygeal pain, mechanical territory");

    // Head
    insert(Zone::FrontalHead, &[], "Frontal headache, tension and sinus territory");
    insert(
        Zone::TemporalHead,
        &[RedFlag::TemporalArteritisRisk],
        "Temporal headache; arteritic features warrant same-day review",
    );
    insert(Zone::OccipitalHead, &[], "Occipital headache, cervicogenic territory");
    insert(
        Zone::WholeHead,
        &[RedFlag::ThunderclapHeadacheRisk],
        "Sudden severe global headache, subarachnoid territory",
    );

    // Extremities
    insert(Zone::Shoulder, &[], "Shoulder pain, rotator cuff territory");
    insert(Zone::Hip, &[], "Hip pain, degenerative and trochanteric territory");
    insert(Zone::Knee, &[], "Knee pain, ligamentous and degenerative territory");
    insert(
        Zone::Calf,
        &[RedFlag::DeepVeinThrombosisRisk],
        "Unilateral calf pain or swelling, venous thrombosis territory",
    );

    table
});

/// Specialty routing for a body region.
fn region_specialty(region: BodyRegion) -> Specialty {
    match region {
        BodyRegion::Chest => Specialty::Cardiology,
        BodyRegion::Abdomen => Specialty::Gastroenterology,
        BodyRegion::Back | BodyRegion::Extremity => Specialty::Orthopedics,
        BodyRegion::Head => Specialty::Neurology,
    }
}

/// Triage level for a zone per the rule table: explicit emergency list, then
/// critical-flag forcing, then the urgent list, otherwise routine.
fn zone_triage_level(zone: Zone, red_flags: &[RedFlag]) -> TriageLevel {
    if EMERGENCY_ZONES.contains(&zone) {
        return TriageLevel::Emergency;
    }
    if red_flags.iter().any(|f| CRITICAL_FLAGS.contains(f)) {
        return TriageLevel::Emergency;
    }
    if URGENT_ZONES.contains(&zone) {
        return TriageLevel::Urgent;
    }
    TriageLevel::Routine
}

/// Consultation modes permitted for a zone.
fn zone_allowed_modes(zone: Zone) -> Vec<ConsultationMode> {
    if ONLINE_EXCLUDED_ZONES.contains(&zone) {
        vec![ConsultationMode::Physical]
    } else {
        vec![ConsultationMode::Online, ConsultationMode::Physical]
    }
}

/// Assesses an anatomical zone identifier.
///
/// This is a pure lookup: the same identifier always yields the same
/// assessment. Identifiers outside the declared zone set resolve to the
/// documented default (no red flags, routine triage, general medicine, both
/// consultation modes) and never error.
pub fn assess(zone_id: &str) -> ZoneAssessment {
    let Some(zone) = Zone::parse(zone_id) else {
        return ZoneAssessment {
            zone_id: zone_id.trim().to_string(),
            red_flags: Vec::new(),
            triage_level: TriageLevel::Routine,
            specialty: Specialty::GeneralMedicine,
            allowed_modes: vec![ConsultationMode::Online, ConsultationMode::Physical],
            clinical_pattern: "Unmapped location, no zone-specific pattern".to_string(),
        };
    };

    static UNMAPPED: ZoneProfile = ZoneProfile {
        red_flags: &[],
        clinical_pattern: "Unmapped location, no zone-specific pattern",
    };
    let profile = ZONE_TABLE.get(&zone).unwrap_or(&UNMAPPED);

    ZoneAssessment {
        zone_id: zone.as_str().to_string(),
        red_flags: profile.red_flags.to_vec(),
        triage_level: zone_triage_level(zone, profile.red_flags),
        specialty: region_specialty(zone.region()),
        allowed_modes: zone_allowed_modes(zone),
        clinical_pattern: profile.clinical_pattern.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_table_covers_every_declared_zone() {
        for zone in Zone::ALL {
            assert!(
                ZONE_TABLE.contains_key(&zone),
                "zone {} has no table entry",
                zone.as_str()
            );
        }
    }

    #[test]
    fn test_emergency_zones_never_permit_online() {
        for zone in Zone::ALL {
            let assessment = assess(zone.as_str());
            if assessment.triage_level == TriageLevel::Emergency {
                assert!(
                    !assessment.allowed_modes.contains(&ConsultationMode::Online),
                    "emergency zone {} permits online consultation",
                    zone.as_str()
                );
            }
        }
    }

    #[test]
    fn test_left_precordial_is_cardiac_emergency() {
        let assessment = assess("LEFT_PRECORDIAL");
        assert!(assessment.red_flags.contains(&RedFlag::CardiacPattern));
        assert_eq!(assessment.triage_level, TriageLevel::Emergency);
        assert_eq!(assessment.specialty, Specialty::Cardiology);
        assert_eq!(assessment.allowed_modes, vec![ConsultationMode::Physical]);
    }

    #[test]
    fn test_right_lower_quadrant_is_urgent_physical_only() {
        let assessment = assess("RIGHT_LOWER_QUADRANT");
        assert!(assessment.red_flags.contains(&RedFlag::AppendicitisPattern));
        assert_eq!(assessment.triage_level, TriageLevel::Urgent);
        assert_eq!(assessment.specialty, Specialty::Gastroenterology);
        assert_eq!(assessment.allowed_modes, vec![ConsultationMode::Physical]);
    }

    #[test]
    fn test_unknown_zone_defaults_without_error() {
        let assessment = assess("LEFT_EARLOBE");
        assert!(assessment.red_flags.is_empty());
        assert_eq!(assessment.triage_level, TriageLevel::Routine);
        assert_eq!(assessment.specialty, Specialty::GeneralMedicine);
        assert_eq!(assessment.allowed_modes.len(), 2);
    }

    #[test]
    fn test_zone_parse_is_case_insensitive() {
        assert_eq!(Zone::parse("left_precordial"), Some(Zone::LeftPrecordial));
        assert_eq!(Zone::parse("  Knee "), Some(Zone::Knee));
        assert_eq!(Zone::parse("NOWHERE"), None);
    }

    #[test]
    fn test_assessment_is_referentially_transparent() {
        assert_eq!(assess("CALF"), assess("calf"));
    }

    #[test]
    fn test_region_specialty_routing() {
        assert_eq!(assess("RETROSTERNAL").specialty, Specialty::Cardiology);
        assert_eq!(assess("UMBILICAL").specialty, Specialty::Gastroenterology);
        assert_eq!(assess("KNEE").specialty, Specialty::Orthopedics);
        assert_eq!(assess("OCCIPITAL_HEAD").specialty, Specialty::Neurology);
    }
}
