//! parameters::registry — the set of fit parameters and its operations.
//!
//! Purpose
//! -------
//! Own every [`FitParameter`] of a fit and expose the only operations that
//! may change them: define, set value/step/limits, fix, release. The
//! minimizer reads a snapshot and the session writes results back through
//! [`ParameterRegistry::apply_fit`]; nothing else mutates parameter state.
//!
//! Invariants & assumptions
//! ------------------------
//! - The parameter count is declared up front; slots are filled by
//!   `define*` calls and indices are never reused.
//! - Names are unique within a registry.
//! - Fixed parameters keep their value across fits; releasing a parameter
//!   restarts it from its last known value.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        minimizer::FunctionMinimum,
    },
    parameters::parameter::FitParameter,
};

/// ParameterRegistry — indexed storage of fit parameters.
///
/// Fields
/// ------
/// - `slots`: one optional parameter per declared index.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRegistry {
    slots: Vec<Option<FitParameter>>,
}

impl ParameterRegistry {
    /// Declare a registry for `n_params` parameters, all initially undefined.
    pub fn new(n_params: usize) -> Self {
        Self { slots: vec![None; n_params] }
    }

    pub fn n_params(&self) -> usize {
        self.slots.len()
    }

    /// Number of defined, non-fixed parameters.
    pub fn n_free(&self) -> usize {
        self.slots.iter().flatten().filter(|p| !p.is_fixed()).count()
    }

    /// Define a free, unbounded parameter.
    ///
    /// # Errors
    /// - [`OptError::IndexOutOfRange`] when `index >= n_params`.
    /// - [`OptError::DuplicateParameter`] when the index (or the name) is
    ///   already in use.
    /// - Value and step validation errors from [`FitParameter::new`].
    pub fn define(
        &mut self, index: usize, name: &str, value: f64, step: f64,
    ) -> OptResult<&FitParameter> {
        self.check_free_slot(index, name)?;
        let param = FitParameter::new(index, name, value, step)?;
        Ok(&*self.slots[index].insert(param))
    }

    /// Define a parameter with both limits set.
    pub fn define_limited(
        &mut self, index: usize, name: &str, value: f64, step: f64, lower: f64, upper: f64,
    ) -> OptResult<&FitParameter> {
        self.check_free_slot(index, name)?;
        let mut param = FitParameter::new(index, name, value, step)?;
        param.set_limits(Some(lower), Some(upper))?;
        Ok(&*self.slots[index].insert(param))
    }

    /// Define a parameter that starts out fixed at `value`.
    pub fn define_fixed(&mut self, index: usize, name: &str, value: f64) -> OptResult<&FitParameter> {
        self.check_free_slot(index, name)?;
        let mut param = FitParameter::new(index, name, value, default_step(value))?;
        param.set_fixed(true);
        Ok(&*self.slots[index].insert(param))
    }

    pub fn get(&self, index: usize) -> OptResult<&FitParameter> {
        self.check_range(index)?;
        self.slots[index].as_ref().ok_or(OptError::UndefinedParameter { index })
    }

    /// Look a parameter up by name.
    pub fn index_of(&self, name: &str) -> OptResult<usize> {
        self.slots
            .iter()
            .flatten()
            .find(|p| p.name() == name)
            .map(FitParameter::index)
            .ok_or_else(|| OptError::UnknownParameterName { name: name.to_string() })
    }

    pub fn set_value(&mut self, index: usize, value: f64) -> OptResult<()> {
        self.get_mut(index)?.set_value(value)
    }

    pub fn set_step(&mut self, index: usize, step: f64) -> OptResult<()> {
        self.get_mut(index)?.set_step(step)
    }

    /// Set both limits.
    ///
    /// # Errors
    /// - [`OptError::InvalidBounds`] when `lower >= upper` or either is not finite.
    /// - [`OptError::ValueOutOfBounds`] when the current value is outside.
    pub fn set_limits(&mut self, index: usize, lower: f64, upper: f64) -> OptResult<()> {
        self.get_mut(index)?.set_limits(Some(lower), Some(upper))
    }

    /// Set only a lower limit, keeping any upper limit.
    pub fn set_lower_limit(&mut self, index: usize, lower: f64) -> OptResult<()> {
        let param = self.get_mut(index)?;
        let upper = param.upper();
        param.set_limits(Some(lower), upper)
    }

    /// Set only an upper limit, keeping any lower limit.
    pub fn set_upper_limit(&mut self, index: usize, upper: f64) -> OptResult<()> {
        let param = self.get_mut(index)?;
        let lower = param.lower();
        param.set_limits(lower, Some(upper))
    }

    pub fn remove_limits(&mut self, index: usize) -> OptResult<()> {
        self.get_mut(index)?.set_limits(None, None)
    }

    /// Exclude a parameter from minimization at its current value.
    pub fn fix(&mut self, index: usize) -> OptResult<()> {
        self.get_mut(index)?.set_fixed(true);
        Ok(())
    }

    /// Move a parameter to `value` and fix it there.
    pub fn set_fixed(&mut self, index: usize, value: f64) -> OptResult<()> {
        let param = self.get_mut(index)?;
        param.set_value(value)?;
        param.set_fixed(true);
        Ok(())
    }

    /// Re-include a fixed parameter; its last known value is the new start.
    pub fn release(&mut self, index: usize) -> OptResult<()> {
        self.get_mut(index)?.set_fixed(false);
        Ok(())
    }

    /// Current values, ordered by index.
    ///
    /// # Errors
    /// - [`OptError::UndefinedParameter`] for the first empty slot.
    pub fn values(&self) -> OptResult<Vec<f64>> {
        Ok(self.parameters()?.iter().map(FitParameter::value).collect())
    }

    /// Errors from the last fit, ordered by index; `None` before any fit.
    /// Fixed parameters report `0.0`.
    pub fn errors(&self) -> Option<Vec<f64>> {
        self.slots.iter().map(|slot| slot.as_ref().and_then(FitParameter::error)).collect()
    }

    /// Snapshot of all parameters, ordered by index.
    ///
    /// # Errors
    /// - [`OptError::NoParameters`] when the registry was declared empty.
    /// - [`OptError::UndefinedParameter`] for the first empty slot.
    pub fn parameters(&self) -> OptResult<Vec<FitParameter>> {
        if self.slots.is_empty() {
            return Err(OptError::NoParameters);
        }
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.clone().ok_or(OptError::UndefinedParameter { index }))
            .collect()
    }

    /// Write a fit result back: best-fit values of free parameters and the
    /// error vector. Fixed parameters keep their value.
    ///
    /// All-or-nothing: every value is checked (and settled onto a limit it
    /// overshoots by round-off) before any parameter changes, so a rejected
    /// result leaves the registry as it was.
    pub(crate) fn apply_fit(&mut self, minimum: &FunctionMinimum) -> OptResult<()> {
        let mut values = Vec::with_capacity(self.slots.len());
        for param in self.slots.iter().flatten() {
            let fitted = match minimum.x().get(param.index()) {
                Some(&value) if !param.is_fixed() => Some(param.admissible(value)?),
                _ => None,
            };
            values.push(fitted);
        }
        for (param, fitted) in self.slots.iter_mut().flatten().zip(values) {
            if let Some(value) = fitted {
                param.set_value(value)?;
            }
            param.set_error(minimum.errors().get(param.index()).copied());
        }
        Ok(())
    }

    // ---- Helper methods ----

    fn get_mut(&mut self, index: usize) -> OptResult<&mut FitParameter> {
        self.check_range(index)?;
        self.slots[index].as_mut().ok_or(OptError::UndefinedParameter { index })
    }

    fn check_range(&self, index: usize) -> OptResult<()> {
        if index >= self.slots.len() {
            return Err(OptError::IndexOutOfRange { index, n_params: self.slots.len() });
        }
        Ok(())
    }

    fn check_free_slot(&self, index: usize, name: &str) -> OptResult<()> {
        self.check_range(index)?;
        if let Some(existing) = &self.slots[index] {
            return Err(OptError::DuplicateParameter { index, name: existing.name().to_string() });
        }
        if let Ok(other) = self.index_of(name) {
            return Err(OptError::DuplicateParameter { index: other, name: name.to_string() });
        }
        Ok(())
    }
}

/// Step used for parameters defined as fixed, where the caller gives none.
fn default_step(value: f64) -> f64 {
    (0.1 * value.abs()).max(0.1)
}
