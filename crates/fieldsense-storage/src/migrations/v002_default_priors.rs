//! V002: Seed model_parameters with the default priors.
//! INSERT OR IGNORE keeps any rows already present.

pub const MIGRATION_SQL: &str = r#"
INSERT OR IGNORE INTO model_parameters (context_type, product, alpha, beta, updated_at) VALUES
    ('heat_stress',      'StressBuster',    8.0, 2.0, unixepoch()),
    ('frost_stress',     'StressBuster',    7.0, 2.0, unixepoch()),
    ('drought_stress',   'StressBuster',    7.0, 2.0, unixepoch()),
    ('soil_quality_low', 'StressBuster',    2.0, 2.0, unixepoch()),
    ('heat_stress',      'YieldBooster',    3.0, 2.0, unixepoch()),
    ('frost_stress',     'YieldBooster',    2.0, 2.0, unixepoch()),
    ('drought_stress',   'YieldBooster',    3.0, 2.0, unixepoch()),
    ('soil_quality_low', 'YieldBooster',    3.0, 2.0, unixepoch()),
    ('heat_stress',      'NutrientBooster', 1.0, 2.0, unixepoch()),
    ('frost_stress',     'NutrientBooster', 1.0, 2.0, unixepoch()),
    ('drought_stress',   'NutrientBooster', 2.0, 2.0, unixepoch()),
    ('soil_quality_low', 'NutrientBooster', 8.0, 2.0, unixepoch());
"#;
