//! Dashboard aggregates over the sample list
//!
//! Averages are reported at dashboard display precision: pH to two decimals,
//! temperature and fertility to one. Empty groups give `None`, never NaN.

use crate::agronomy::soil_derivation::round_to;
use crate::core_types::{Municipality, NutrientFraction};
use crate::sample::SoilSample;
use chrono::Datelike;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running sums for one group of samples
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    count: usize,
    ph: f64,
    temperature: f64,
    fertility: f64,
    nitrogen: NutrientSum,
    phosphorus: NutrientSum,
    potassium: NutrientSum,
    point_scales: [usize; 5],
}

#[derive(Debug, Clone, Copy, Default)]
struct NutrientSum {
    count: usize,
    total: f64,
}

impl NutrientSum {
    fn add(&mut self, value: Option<NutrientFraction>) {
        if let Some(v) = value {
            self.count += 1;
            self.total += *v;
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            total: self.total + other.total,
        }
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| round_to(self.total / self.count as f64, 2))
    }
}

impl Accumulator {
    fn add(mut self, s: &SoilSample) -> Self {
        self.count += 1;
        self.ph += *s.ph;
        self.temperature += s.temperature.value();
        self.fertility += *s.fertility;
        self.nitrogen.add(s.nitrogen);
        self.phosphorus.add(s.phosphorus);
        self.potassium.add(s.potassium);
        self.point_scales[usize::from(s.point_scale.value()) - 1] += 1;
        self
    }

    fn merge(self, other: Self) -> Self {
        let mut point_scales = self.point_scales;
        for (slot, extra) in point_scales.iter_mut().zip(other.point_scales) {
            *slot += extra;
        }
        Self {
            count: self.count + other.count,
            ph: self.ph + other.ph,
            temperature: self.temperature + other.temperature,
            fertility: self.fertility + other.fertility,
            nitrogen: self.nitrogen.merge(other.nitrogen),
            phosphorus: self.phosphorus.merge(other.phosphorus),
            potassium: self.potassium.merge(other.potassium),
            point_scales,
        }
    }

    fn collect<'a, I>(samples: I) -> Self
    where
        I: ParallelIterator<Item = &'a SoilSample>,
    {
        samples
            .fold(Accumulator::default, Accumulator::add)
            .reduce(Accumulator::default, Accumulator::merge)
    }

    fn mean(self, sum: f64, decimals: i32) -> Option<f64> {
        (self.count > 0).then(|| round_to(sum / self.count as f64, decimals))
    }

    fn averages(self) -> Averages {
        Averages {
            ph: self.mean(self.ph, 2),
            temperature: self.mean(self.temperature, 1),
            fertility: self.mean(self.fertility, 1),
        }
    }
}

/// Mean pH, temperature and fertility of a group
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    /// Mean pH (two decimals)
    pub ph: Option<f64>,
    /// Mean temperature in °C (one decimal)
    pub temperature: Option<f64>,
    /// Mean fertility in % (one decimal)
    pub fertility: Option<f64>,
}

/// Mean nutrient fractions over the samples that recorded them
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientAverages {
    /// Mean nitrogen fraction
    pub nitrogen: Option<f64>,
    /// Mean phosphorus fraction
    pub phosphorus: Option<f64>,
    /// Mean potassium fraction
    pub potassium: Option<f64>,
}

/// Per-municipality card on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalitySummary {
    /// Municipality
    pub municipality: Municipality,
    /// Number of samples
    pub count: usize,
    /// Mean readings
    pub averages: Averages,
    /// Mean NPK
    pub nutrients: NutrientAverages,
}

/// Monthly trend point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// Calendar year
    pub year: i32,
    /// Month 1-12
    pub month: u32,
    /// Samples recorded in the month
    pub count: usize,
    /// Mean readings
    pub averages: Averages,
}

impl MonthlyTrend {
    /// Short month label ("Jan", "Feb", ...)
    pub fn label(&self) -> &'static str {
        const LABELS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        LABELS
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("?")
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Total samples
    pub sample_count: usize,
    /// Averages over all samples
    pub overall: Averages,
    /// One summary per municipality, in display order
    pub municipalities: Vec<MunicipalitySummary>,
    /// Sample counts per point scale; index 0 is scale 1
    pub point_scale_histogram: [usize; 5],
    /// Chronological monthly averages
    pub monthly: Vec<MonthlyTrend>,
}

impl DashboardStats {
    /// Aggregate a sample list
    pub fn from_samples(samples: &[SoilSample]) -> Self {
        let overall = Accumulator::collect(samples.par_iter());

        let municipalities = Municipality::ALL
            .into_iter()
            .map(|municipality| {
                let acc = Accumulator::collect(
                    samples
                        .par_iter()
                        .filter(move |s| s.municipality == municipality),
                );
                MunicipalitySummary {
                    municipality,
                    count: acc.count,
                    averages: acc.averages(),
                    nutrients: NutrientAverages {
                        nitrogen: acc.nitrogen.mean(),
                        phosphorus: acc.phosphorus.mean(),
                        potassium: acc.potassium.mean(),
                    },
                }
            })
            .collect();

        let mut by_month: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
        for s in samples {
            let key = (s.created_at.year(), s.created_at.month());
            let acc = by_month.entry(key).or_default();
            *acc = acc.add(s);
        }
        let monthly = by_month
            .into_iter()
            .map(|((year, month), acc)| MonthlyTrend {
                year,
                month,
                count: acc.count,
                averages: acc.averages(),
            })
            .collect();

        Self {
            sample_count: overall.count,
            overall: overall.averages(),
            municipalities,
            point_scale_histogram: overall.point_scales,
            monthly,
        }
    }

    /// Summary for one municipality
    pub fn municipality(&self, municipality: Municipality) -> Option<&MunicipalitySummary> {
        self.municipalities
            .iter()
            .find(|m| m.municipality == municipality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::fixtures::sample;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_input_has_no_averages() {
        let stats = DashboardStats::from_samples(&[]);
        assert_eq!(stats.sample_count, 0);
        assert_eq!(stats.overall, Averages::default());
        assert_eq!(stats.municipalities.len(), 3);
        assert!(stats.monthly.is_empty());
    }

    #[test]
    fn test_overall_and_per_municipality() {
        let samples = vec![
            sample(1, "u", Municipality::Sallapadan, 20.0), // pH 6.5, fert 81
            sample(2, "u", Municipality::Sallapadan, 25.0), // pH 7.5, fert 100
            sample(3, "u", Municipality::Bucay, 36.0),      // pH 4.0, fert 21
        ];
        let stats = DashboardStats::from_samples(&samples);

        assert_eq!(stats.sample_count, 3);
        assert_eq!(stats.overall.ph, Some(6.0));
        assert_eq!(stats.overall.temperature, Some(27.0));
        assert_eq!(stats.overall.fertility, Some(67.3));
        assert_eq!(stats.point_scale_histogram, [0, 1, 0, 0, 2]);

        let sallapadan = stats.municipality(Municipality::Sallapadan).unwrap();
        assert_eq!(sallapadan.count, 2);
        assert_eq!(sallapadan.averages.ph, Some(7.0));
        assert_eq!(sallapadan.nutrients.nitrogen, Some(0.25));
        assert_eq!(sallapadan.nutrients.potassium, None);

        let lagangilang = stats.municipality(Municipality::Lagangilang).unwrap();
        assert_eq!(lagangilang.count, 0);
        assert_eq!(lagangilang.averages.ph, None);
    }

    #[test]
    fn test_monthly_trend_is_chronological() {
        let mut jan = sample(1, "u", Municipality::Bucay, 26.0);
        jan.created_at = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let mut dec = sample(2, "u", Municipality::Bucay, 28.0);
        dec.created_at = Utc.with_ymd_and_hms(2024, 12, 5, 0, 0, 0).unwrap();
        let mut jan2 = sample(3, "u", Municipality::Bucay, 30.0);
        jan2.created_at = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();

        let stats = DashboardStats::from_samples(&[jan, dec, jan2]);
        let labels: Vec<_> = stats
            .monthly
            .iter()
            .map(|m| (m.year, m.label(), m.count))
            .collect();
        assert_eq!(labels, vec![(2024, "Dec", 1), (2025, "Jan", 2)]);
        assert_eq!(stats.monthly[1].averages.temperature, Some(28.0));
    }
}
