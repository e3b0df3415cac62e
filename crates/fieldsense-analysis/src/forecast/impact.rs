//! Per-product risk reduction factors.

use fieldsense_core::types::{DailyRisk, Product, ProductImpact};

/// Fraction of each risk axis a product removes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactFactors {
    pub heat_stress: f64,
    pub frost_stress: f64,
    pub drought_stress: f64,
}

pub fn impact_factors(product: Product) -> ImpactFactors {
    let (heat_stress, frost_stress, drought_stress) = match product {
        Product::StressBuster => (0.30, 0.25, 0.35),
        Product::YieldBooster => (0.15, 0.10, 0.20),
        Product::NutrientBooster => (0.05, 0.05, 0.15),
    };
    ImpactFactors {
        heat_stress,
        frost_stress,
        drought_stress,
    }
}

/// `(risk clamped at 0 after reduction, reduction)`.
fn reduce(risk: f64, factor: f64) -> (f64, f64) {
    let reduction = risk * factor;
    ((risk - reduction).max(0.0), reduction)
}

/// Attach the product's impact to one forecast day.
pub fn apply_impact(day: &mut DailyRisk, factors: &ImpactFactors) {
    let (heat_stress_with_product, heat_stress_reduction) =
        reduce(day.heat_stress, factors.heat_stress);
    let (frost_stress_with_product, frost_stress_reduction) =
        reduce(day.frost_stress, factors.frost_stress);
    let (drought_stress_with_product, drought_stress_reduction) =
        reduce(day.drought_stress, factors.drought_stress);

    day.product_impact = Some(ProductImpact {
        heat_stress_with_product,
        heat_stress_reduction,
        frost_stress_with_product,
        frost_stress_reduction,
        drought_stress_with_product,
        drought_stress_reduction,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_clamps_at_zero() {
        assert_eq!(reduce(0.0, 0.3), (0.0, 0.0));
        let (with_product, reduction) = reduce(9.0, 0.35);
        assert!((reduction - 3.15).abs() < 1e-12);
        assert!((with_product - 5.85).abs() < 1e-12);
        // Negative scores never come out of scoring, but stay non-negative.
        assert_eq!(reduce(-1.0, 0.5).0, 0.0);
    }

    #[test]
    fn test_factor_table() {
        assert_eq!(impact_factors(Product::YieldBooster).frost_stress, 0.10);
        assert_eq!(impact_factors(Product::NutrientBooster).drought_stress, 0.15);
    }
}
