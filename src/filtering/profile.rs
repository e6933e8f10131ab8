use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid price ceiling {0:?}: expected a number")]
    InvalidPriceCeiling(String),
}

/// A single filter criterion. Its name is what the [`super::FieldMap`] is
/// consulted with to find the listing key.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Only listings priced strictly below the ceiling pass.
    Price { ceiling: f64 },
    /// Substring of any RAM module descriptor.
    Ram(String),
    /// Substring of the CPU designation (or any element, for arrays).
    Cpu(String),
    /// Any other criterion (location, traffic, ...): exact membership for
    /// arrays, substring for scalars.
    Field { name: String, value: String },
}

impl Criterion {
    pub const PRICE: &'static str = "PRICE";
    pub const RAM: &'static str = "RAM";
    pub const CPU: &'static str = "CPU";

    /// Classifies a raw `name = value` pair. Returns `Ok(None)` for an inactive (empty) value.
    pub fn parse(name: &str, raw: &str) -> Result<Option<Self>, FilterError> {
        if raw.is_empty() {
            return Ok(None);
        }
        let criterion = if name.eq_ignore_ascii_case(Self::PRICE) {
            let ceiling = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|c| c.is_finite())
                .ok_or_else(|| FilterError::InvalidPriceCeiling(raw.to_string()))?;
            Criterion::Price { ceiling }
        } else if name.eq_ignore_ascii_case(Self::RAM) {
            Criterion::Ram(raw.to_string())
        } else if name.eq_ignore_ascii_case(Self::CPU) {
            Criterion::Cpu(raw.to_string())
        } else {
            Criterion::Field {
                name: name.to_string(),
                value: raw.to_string(),
            }
        };
        Ok(Some(criterion).filter(Criterion::is_active))
    }

    pub fn name(&self) -> &str {
        match self {
            Criterion::Price { .. } => Self::PRICE,
            Criterion::Ram(_) => Self::RAM,
            Criterion::Cpu(_) => Self::CPU,
            Criterion::Field { name, .. } => name,
        }
    }

    /// Empty text and a zero price ceiling are inactive and never evaluated.
    pub fn is_active(&self) -> bool {
        match self {
            Criterion::Price { ceiling } => *ceiling != 0.0,
            Criterion::Ram(v) | Criterion::Cpu(v) => !v.is_empty(),
            Criterion::Field { value, .. } => !value.is_empty(),
        }
    }
}

/// The set of criteria a listing must all satisfy to be reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterProfile {
    criteria: Vec<Criterion>,
}

impl FilterProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets criterion `name` from its raw text. An empty value clears it.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), FilterError> {
        self.criteria.retain(|c| !c.name().eq_ignore_ascii_case(name));
        if let Some(criterion) = Criterion::parse(name, raw)? {
            self.criteria.push(criterion);
        }
        Ok(())
    }

    pub fn with(mut self, name: &str, raw: &str) -> Result<Self, FilterError> {
        self.set(name, raw)?;
        Ok(self)
    }

    pub fn with_price_ceiling(mut self, ceiling: f64) -> Self {
        self.criteria.retain(|c| !matches!(c, Criterion::Price { .. }));
        let criterion = Criterion::Price { ceiling };
        if criterion.is_active() {
            self.criteria.push(criterion);
        }
        self
    }

    pub fn active_criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|c| c.is_active())
    }

    /// True when no criterion is active; every listing then matches.
    pub fn is_empty(&self) -> bool {
        self.active_criteria().next().is_none()
    }
}
