//! Closed vocabularies of the dataset: the four suitability categories and the
//! continuous indicator layers a map can be colored by.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Attribute key holding the state name.
pub const STATE_FIELD: &str = "NAME_1";
/// Attribute key holding the district name.
pub const DISTRICT_FIELD: &str = "NAME_2";

/// State name of the national rollup row.
pub const NATIONAL_AVERAGE: &str = "National Average";
/// District name of every rollup row.
pub const ALL_DISTRICTS: &str = "All Districts";
/// Placeholder written into generic text fields of state rollups.
pub const STATE_AVERAGE: &str = "State Average";
/// Category value of a rollup without a determinable mode.
pub const MIXED: &str = "Mixed";

/// Suitability category; decides which classification scale applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Adaptation,
    Mitigation,
    Replacement,
    GeneralSuitabilityIndex,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Adaptation,
        Category::Mitigation,
        Category::Replacement,
        Category::GeneralSuitabilityIndex,
    ];

    /// Attribute key used by the source shapefile (note the misspelt `Replacment`).
    pub fn column(&self) -> &'static str {
        match self {
            Category::Adaptation => "Adaptation",
            Category::Mitigation => "Mitigation",
            Category::Replacement => "Replacment",
            Category::GeneralSuitabilityIndex => "General_SI",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Adaptation => "Adaptation",
            Category::Mitigation => "Mitigation",
            Category::Replacement => "Replacement",
            Category::GeneralSuitabilityIndex => "General Suitability Index",
        }
    }

    /// Adaptation is an inverted metric: low values are the most suitable.
    #[inline] pub fn is_inverted(&self) -> bool { matches!(self, Category::Adaptation) }

    /// Look up a category by its exact column key.
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.column() == column)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL.into_iter()
            .find(|c| c.column().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .or_else(|| match s.to_ascii_lowercase().as_str() {
                "general" | "gsi" | "general-si" => Some(Category::GeneralSuitabilityIndex),
                _ => None,
            })
            .ok_or_else(|| anyhow!("unknown category: {s}"))
    }
}

/// A continuous indicator that can be selected for map coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    SolarRadiance,
    CroppingIntensity,
    IrrigationCoverage,
    IrrigationWaterRequirement,
    CultivatedLand,
    PumpEnergy,
    EnergySubsidy,
    GwDevelopmentStage,
    ShallowAquifer,
    SurfaceWaterBody,
    SmallMarginalHoldings,
    FarmersAverageArea,
    LandFragmentation,
    AridityIndex,
    Others,
}

impl Default for Layer {
    fn default() -> Self { Layer::GwDevelopmentStage }
}

impl Layer {
    pub const ALL: [Layer; 15] = [
        Layer::SolarRadiance,
        Layer::CroppingIntensity,
        Layer::IrrigationCoverage,
        Layer::IrrigationWaterRequirement,
        Layer::CultivatedLand,
        Layer::PumpEnergy,
        Layer::EnergySubsidy,
        Layer::GwDevelopmentStage,
        Layer::ShallowAquifer,
        Layer::SurfaceWaterBody,
        Layer::SmallMarginalHoldings,
        Layer::FarmersAverageArea,
        Layer::LandFragmentation,
        Layer::AridityIndex,
        Layer::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Layer::SolarRadiance => "Solar radiance",
            Layer::CroppingIntensity => "Cropping Intensity (%)",
            Layer::IrrigationCoverage => "Irrigation Coverage (%)",
            Layer::IrrigationWaterRequirement => "Irrigation Water Requirement",
            Layer::CultivatedLand => "Cultivated land",
            Layer::PumpEnergy => "Pump energy",
            Layer::EnergySubsidy => "Energy Subsidy",
            Layer::GwDevelopmentStage => "GW Development Stage",
            Layer::ShallowAquifer => "Aquifer(Shallow) (mbgl)",
            Layer::SurfaceWaterBody => "Surface Water Body (ha)",
            Layer::SmallMarginalHoldings => "Small & marginal holdings (%)",
            Layer::FarmersAverageArea => "Farmers average area (ha)",
            Layer::LandFragmentation => "Land fragmentation (number)",
            Layer::AridityIndex => "Aridity Index",
            Layer::Others => "Others",
        }
    }

    /// Attribute key of the layer in the source shapefile.
    pub fn column(&self) -> &'static str {
        match self {
            Layer::SolarRadiance => "Rainfall__",
            Layer::CroppingIntensity => "CI_yield",
            Layer::IrrigationCoverage => "Irrig_cov_",
            Layer::IrrigationWaterRequirement => "C_Irr_Ex_G",
            Layer::CultivatedLand => "C_Land_Rc",
            Layer::PumpEnergy => "C_PHS",
            Layer::EnergySubsidy => "C_E_FC",
            Layer::GwDevelopmentStage => "GW_dev_sta",
            Layer::ShallowAquifer => "Aquifer_ty",
            Layer::SurfaceWaterBody => "Sw____",
            Layer::SmallMarginalHoldings => "C_S_H",
            Layer::FarmersAverageArea => "C_F_L",
            Layer::LandFragmentation => "C_L_R",
            Layer::AridityIndex => "aridity",
            Layer::Others => "Himalayan",
        }
    }

    /// Tooltip text; `Others` has none.
    pub fn description(&self) -> Option<&'static str> {
        Some(match self {
            Layer::SolarRadiance => "Gives solar radiance",
            Layer::CroppingIntensity => "Gives how intensively an area is cultivated (Gross cultivated area/Net cultivated area)",
            Layer::IrrigationCoverage => "Gives the extent of irrigation coverage and contribution of GW in a district.",
            Layer::IrrigationWaterRequirement => "Gives irrigation requirement (as part of consumptive needs) which provide information on crop water needs relative to rainfall in a district.",
            Layer::CultivatedLand => "Gives indication of how intensively a district is cultivated.",
            Layer::PumpEnergy => "Gives source of power for groundwater pumping, here electric with most of the rest being diesel.",
            Layer::EnergySubsidy => "Indicators how subsidises electricity for pumping is in a district.",
            Layer::GwDevelopmentStage => "How much groundwater has been used in a district relative to recharge.",
            Layer::ShallowAquifer => "How deep are the groundwater tables, this dictates energy needed for pumping.",
            Layer::SurfaceWaterBody => "Extent of surface water body area (ha) in a district, gives the suitability of using solar with surface water sources",
            Layer::SmallMarginalHoldings => "Percent of small and marginal farmers in a district.",
            Layer::FarmersAverageArea => "Average holding of farmer",
            Layer::LandFragmentation => "Number of parcels per holding indicating how fragmented the land holdings are.",
            Layer::AridityIndex => "Measure of dryness of the climate, higher values indicate more arid conditions.",
            Layer::Others => return None,
        })
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Layer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL.into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(s) || l.column().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("unknown layer: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_column_and_label() {
        assert_eq!("Replacment".parse::<Category>().unwrap(), Category::Replacement);
        assert_eq!("replacement".parse::<Category>().unwrap(), Category::Replacement);
        assert_eq!("General_SI".parse::<Category>().unwrap(), Category::GeneralSuitabilityIndex);
        assert!("Nonsense".parse::<Category>().is_err());
        assert_eq!(Category::from_column("General_SI"), Some(Category::GeneralSuitabilityIndex));
        assert_eq!(Category::from_column("General Suitability Index"), None);
    }

    #[test]
    fn only_adaptation_is_inverted() {
        let inverted: Vec<_> = Category::ALL.into_iter().filter(Category::is_inverted).collect();
        assert_eq!(inverted, vec![Category::Adaptation]);
    }

    #[test]
    fn layer_lookup() {
        assert_eq!(Layer::default().column(), "GW_dev_sta");
        assert_eq!("GW Development Stage".parse::<Layer>().unwrap(), Layer::GwDevelopmentStage);
        assert_eq!("aridity".parse::<Layer>().unwrap(), Layer::AridityIndex);
        assert!(Layer::Others.description().is_none());
        assert!(Layer::ALL.iter().filter(|l| **l != Layer::Others).all(|l| l.description().is_some()));
    }
}
