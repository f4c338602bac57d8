//! Field catalog: what each wizard step asks.
//!
//! The catalog is the closed set of legal field paths. [`crate::FieldPath`]
//! validates against it, and the TUI renders steps straight from it.

use crate::step::{Section, Step};

/// Value type of a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Single choice among fixed options, stored as text.
    Choice(&'static [&'static str]),
    /// Number with a display unit.
    Number { unit: &'static str },
    /// Percentage, clamped to `[0, 100]` on entry.
    Percent,
    /// Ordered set of options.
    Multi(&'static [&'static str]),
}

impl FieldKind {
    #[must_use]
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            FieldKind::Choice(options) | FieldKind::Multi(options) => options,
            FieldKind::Text | FieldKind::Number { .. } | FieldKind::Percent => &[],
        }
    }

    /// Whether the field is edited through a free-form text buffer.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::Number { .. } | FieldKind::Percent
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Shown only in the advanced side panel.
    pub advanced: bool,
}

/// Collapsible reference note shown under a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub key: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug)]
pub struct StepInfo {
    pub step: Step,
    /// Body of the "why we ask" panel.
    pub why: &'static str,
    pub fields: &'static [FieldSpec],
    pub notes: &'static [Note],
}

impl StepInfo {
    pub fn primary_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.fields.iter().filter(|f| !f.advanced)
    }

    pub fn advanced_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.fields.iter().filter(|f| f.advanced)
    }
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        advanced: false,
    }
}

const fn advanced(key: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        advanced: true,
    }
}

const DYE_RANGES: &[&str] = &["Rope", "Slasher (sheet)", "Loop"];
const REDUCTION_AGENTS: &[&str] = &[
    "Sodium hydrosulfite",
    "Pre-reduced indigo",
    "Electrochemical",
    "Glucose-based",
];
const FINISHING_STEPS: &[&str] = &[
    "Singeing",
    "Mercerizing",
    "Sanforizing",
    "Skewing",
    "Coating",
    "Laser",
];
const ETP_BLOCKS: &[&str] = &["Physical", "Chemical", "Biological", "Tertiary", "ZLD"];
const SLUDGE_ROUTES: &[&str] = &["Landfill", "Co-processing", "Brick kiln", "Incineration"];
const STEAM_SOURCES: &[&str] = &["Coal boiler", "Gas boiler", "Biomass boiler", "Waste heat"];
const PPE_ITEMS: &[&str] = &[
    "Gloves",
    "Goggles",
    "Respirator",
    "Apron",
    "Safety shoes",
    "Ear protection",
];
const STORAGE_TYPES: &[&str] = &["Bunded store", "Open shed", "Tank farm"];
const HANDOVER_STATUS: &[&str] = &["Draft", "Ready for review", "Approved"];

static STEPS: [StepInfo; 7] = [
    StepInfo {
        step: Step::WarpRange,
        why: "Range type and warp geometry set how many dips the yarn sees and how \
              much liquor is dragged out per metre.",
        fields: &[
            field("dye_range", "Dye range type", FieldKind::Choice(DYE_RANGES)),
            field("yarn_count_ne", "Yarn count", FieldKind::Number { unit: "Ne" }),
            field("ends", "Ends per beam", FieldKind::Number { unit: "ends" }),
            field("speed_m_min", "Range speed", FieldKind::Number { unit: "m/min" }),
            advanced("ropes", "Ropes per run", FieldKind::Number { unit: "ropes" }),
            advanced("creel_notes", "Creel notes", FieldKind::Text),
        ],
        notes: &[Note {
            key: "typical",
            title: "Typical ranges",
            body: "Rope ranges run 24-36 m/min; slasher ranges 20-30 m/min.",
        }],
    },
    StepInfo {
        step: Step::IndigoControl,
        why: "Indigo and reducer concentrations drive shade depth and the chemical \
              load that reaches the effluent plant.",
        fields: &[
            field(
                "indigo_g_l",
                "Indigo concentration",
                FieldKind::Number { unit: "g/L" },
            ),
            field(
                "reduction_agent",
                "Reduction agent",
                FieldKind::Choice(REDUCTION_AGENTS),
            ),
            field("ph_target", "Bath pH target", FieldKind::Number { unit: "pH" }),
            field("dips", "Number of dips", FieldKind::Number { unit: "dips" }),
            advanced("redox_mv", "Redox potential", FieldKind::Number { unit: "mV" }),
            advanced(
                "hydro_g_l",
                "Hydrosulfite dosing",
                FieldKind::Number { unit: "g/L" },
            ),
        ],
        notes: &[
            Note {
                key: "ph",
                title: "pH window",
                body: "Leuco-indigo absorbs best between pH 10.8 and 11.5.",
            },
            Note {
                key: "redox",
                title: "Redox check",
                body: "Aim for -750 to -850 mV against Ag/AgCl.",
            },
        ],
    },
    StepInfo {
        step: Step::ShadeFinish,
        why: "Finishing steps add water, energy and chemistry after dyeing; we need \
              them to complete the footprint.",
        fields: &[
            field("target_shade", "Target shade", FieldKind::Text),
            field(
                "finishing_steps",
                "Finishing steps",
                FieldKind::Multi(FINISHING_STEPS),
            ),
            field(
                "delta_e_tolerance",
                "Shade tolerance",
                FieldKind::Number { unit: "dE" },
            ),
            advanced("shrinkage_pct", "Residual shrinkage", FieldKind::Percent),
        ],
        notes: &[],
    },
    StepInfo {
        step: Step::Etp,
        why: "The treatment train decides whether reuse is possible and what \
              leaves the site.",
        fields: &[
            field("blocks", "Treatment blocks", FieldKind::Multi(ETP_BLOCKS)),
            field(
                "capacity_m3_day",
                "Design capacity",
                FieldKind::Number { unit: "m3/day" },
            ),
            field("reuse_pct", "Water reuse", FieldKind::Percent),
            field(
                "cod_outlet_mg_l",
                "Outlet COD",
                FieldKind::Number { unit: "mg/L" },
            ),
            advanced("sludge_route", "Sludge route", FieldKind::Choice(SLUDGE_ROUTES)),
            advanced(
                "color_outlet_pt_co",
                "Outlet colour",
                FieldKind::Number { unit: "Pt-Co" },
            ),
        ],
        notes: &[Note {
            key: "limits",
            title: "Discharge limits",
            body: "Common permits cap COD at 250 mg/L and colour at 150 Pt-Co.",
        }],
    },
    StepInfo {
        step: Step::Footprints,
        why: "Per-metre water and energy figures let buyers compare mills on the \
              same basis.",
        fields: &[
            field(
                "water_l_per_m",
                "Water intensity",
                FieldKind::Number { unit: "L/m" },
            ),
            field(
                "energy_kwh_per_m",
                "Energy intensity",
                FieldKind::Number { unit: "kWh/m" },
            ),
            field("energy_mix_grid_pct", "Grid electricity share", FieldKind::Percent),
            field(
                "energy_mix_solar_pct",
                "Solar electricity share",
                FieldKind::Percent,
            ),
            advanced("steam_source", "Steam source", FieldKind::Choice(STEAM_SOURCES)),
            advanced(
                "chemicals_g_per_m",
                "Chemical intensity",
                FieldKind::Number { unit: "g/m" },
            ),
        ],
        notes: &[Note {
            key: "basis",
            title: "Measurement basis",
            body: "Report per linear metre of finished fabric at 150 cm width.",
        }],
    },
    StepInfo {
        step: Step::Safety,
        why: "Reducers and caustic are the main occupational hazards in an \
              indigo range.",
        fields: &[
            field("ppe", "PPE in use", FieldKind::Multi(PPE_ITEMS)),
            field(
                "chemical_storage",
                "Chemical storage",
                FieldKind::Choice(STORAGE_TYPES),
            ),
            field(
                "incidents_last_year",
                "Recordable incidents (12 months)",
                FieldKind::Number { unit: "incidents" },
            ),
            advanced("hydro_handling", "Hydrosulfite handling", FieldKind::Text),
        ],
        notes: &[],
    },
    StepInfo {
        step: Step::Handover,
        why: "A named contact lets the reviewer close open questions quickly.",
        fields: &[
            field("contact_name", "Contact name", FieldKind::Text),
            field("contact_email", "Contact email", FieldKind::Text),
            field("status", "Status", FieldKind::Choice(HANDOVER_STATUS)),
            field("notes", "Notes", FieldKind::Text),
        ],
        notes: &[],
    },
];

#[must_use]
pub fn step_info(step: Step) -> &'static StepInfo {
    &STEPS[step.index()]
}

#[must_use]
pub fn field_spec(section: Section, key: &str) -> Option<&'static FieldSpec> {
    STEPS
        .iter()
        .find(|info| info.step.section() == section)
        .and_then(|info| info.fields.iter().find(|f| f.key == key))
}
