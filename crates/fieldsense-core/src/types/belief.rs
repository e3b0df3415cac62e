//! Beta posterior parameters per (context, product).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContextType, Product};

/// One Beta(alpha, beta) belief. Both shapes stay strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeliefParameter {
    pub alpha: f64,
    pub beta: f64,
    pub updated_at: DateTime<Utc>,
}

impl BeliefParameter {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha,
            beta,
            updated_at: Utc::now(),
        }
    }

    /// Both shape parameters are finite and > 0.
    pub fn is_valid(&self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite() && self.alpha > 0.0 && self.beta > 0.0
    }
}

/// Default priors (alpha, beta), rows in `ContextType::ALL` order,
/// columns in `Product::ALL` order.
pub const DEFAULT_PRIORS: [[(f64, f64); 3]; 4] = [
    // heat_stress
    [(8.0, 2.0), (3.0, 2.0), (1.0, 2.0)],
    // frost_stress
    [(7.0, 2.0), (2.0, 2.0), (1.0, 2.0)],
    // drought_stress
    [(7.0, 2.0), (3.0, 2.0), (2.0, 2.0)],
    // soil_quality_low
    [(2.0, 2.0), (3.0, 2.0), (8.0, 2.0)],
];

/// Prior for one cell.
pub fn default_prior(context: ContextType, product: Product) -> (f64, f64) {
    DEFAULT_PRIORS[context.index()][product.index()]
}

/// Dense 4x3 table of beliefs.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefTable {
    cells: [[BeliefParameter; 3]; 4],
}

impl BeliefTable {
    /// The prior table used to seed a fresh store.
    pub fn defaults() -> Self {
        let now = Utc::now();
        let cells = DEFAULT_PRIORS.map(|row| {
            row.map(|(alpha, beta)| BeliefParameter {
                alpha,
                beta,
                updated_at: now,
            })
        });
        Self { cells }
    }

    pub fn get(&self, context: ContextType, product: Product) -> BeliefParameter {
        self.cells[context.index()][product.index()]
    }

    pub fn set(&mut self, context: ContextType, product: Product, param: BeliefParameter) {
        self.cells[context.index()][product.index()] = param;
    }

    /// All cells in (context, product) enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (ContextType, Product, BeliefParameter)> + '_ {
        ContextType::ALL.into_iter().flat_map(move |c| {
            Product::ALL
                .into_iter()
                .map(move |p| (c, p, self.get(c, p)))
        })
    }
}

impl Default for BeliefTable {
    fn default() -> Self {
        Self::defaults()
    }
}

/// An additive change to one belief cell.
///
/// `feedback_id` ties the change to the feedback row that caused it so the
/// store can refuse to apply the same feedback twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefUpdate {
    pub context: ContextType,
    pub product: Product,
    pub alpha_delta: f64,
    pub beta_delta: f64,
    pub feedback_id: Option<i64>,
}
