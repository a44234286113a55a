//! MIP Model
//!
//! Engine-neutral record of a mixed-integer model: bounded variables, ranged
//! linear constraints and a linear objective. The pick list builders write into
//! a [`MipModel`], and a [`SolverEngine`](crate::solvers::engine::SolverEngine)
//! translates it into whatever backend it drives.

use std::fmt;

/// Handle to a variable in a [`MipModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarHandle(usize);

impl VarHandle {
    /// Position of the variable in the model (and in solution value vectors).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a constraint in a [`MipModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintHandle(usize);

impl ConstraintHandle {
    /// Position of the constraint in the model.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Integer-valued
    Integer,

    /// Integer restricted to `{0, 1}`
    Boolean,
}

/// A bounded model variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelVariable {
    /// Variable domain
    pub kind: VariableKind,

    /// Lower bound
    pub lower: f64,

    /// Upper bound
    pub upper: f64,

    /// Human-readable label
    pub label: String,
}

/// A ranged linear constraint: `lower <= sum(coefficient * var) <= upper`.
///
/// Either bound may be infinite.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConstraint {
    /// Lower bound (may be `f64::NEG_INFINITY`)
    pub lower: f64,

    /// Upper bound (may be `f64::INFINITY`)
    pub upper: f64,

    /// Non-zero terms, in insertion order
    pub terms: Vec<(VarHandle, f64)>,
}

impl ModelConstraint {
    /// Evaluate the left-hand side for the given variable values.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coefficient)| coefficient * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether the constraint holds for the given variable values, within `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let activity = self.activity(values);

        activity >= self.lower - tolerance && activity <= self.upper + tolerance
    }
}

/// Optimisation direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sense {
    /// Minimise the objective
    #[default]
    Minimise,

    /// Maximise the objective
    Maximise,
}

/// Engine-neutral mixed-integer model.
#[derive(Clone, Default)]
pub struct MipModel {
    name: String,
    variables: Vec<ModelVariable>,
    constraints: Vec<ModelConstraint>,
    objective: Vec<(VarHandle, f64)>,
    sense: Sense,
}

impl fmt::Debug for MipModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MipModel")
            .field("name", &self.name)
            .field(
                "variables",
                &format!("[{} variables]", self.variables.len()),
            )
            .field(
                "constraints",
                &format!("[{} constraints]", self.constraints.len()),
            )
            .field("objective", &format!("[{} terms]", self.objective.len()))
            .field("sense", &self.sense)
            .finish()
    }
}

impl MipModel {
    /// Create an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an integer variable bounded in `[lower, upper]`.
    pub fn add_integer_variable(
        &mut self,
        lower: f64,
        upper: f64,
        label: impl Into<String>,
    ) -> VarHandle {
        self.push_variable(ModelVariable {
            kind: VariableKind::Integer,
            lower,
            upper,
            label: label.into(),
        })
    }

    /// Add a `{0, 1}` variable.
    pub fn add_boolean_variable(&mut self, label: impl Into<String>) -> VarHandle {
        self.push_variable(ModelVariable {
            kind: VariableKind::Boolean,
            lower: 0.0,
            upper: 1.0,
            label: label.into(),
        })
    }

    fn push_variable(&mut self, variable: ModelVariable) -> VarHandle {
        self.variables.push(variable);

        VarHandle(self.variables.len() - 1)
    }

    /// Add an empty constraint bounded in `[lower, upper]`.
    ///
    /// Terms are added afterwards with [`MipModel::set_coefficient`].
    pub fn add_constraint(&mut self, lower: f64, upper: f64) -> ConstraintHandle {
        self.constraints.push(ModelConstraint {
            lower,
            upper,
            terms: Vec::new(),
        });

        ConstraintHandle(self.constraints.len() - 1)
    }

    /// Set the coefficient of `var` in `constraint`, replacing any previous value.
    ///
    /// Unknown constraint handles are ignored; handles are only minted by this model.
    pub fn set_coefficient(
        &mut self,
        constraint: ConstraintHandle,
        var: VarHandle,
        coefficient: f64,
    ) {
        if let Some(constraint) = self.constraints.get_mut(constraint.index()) {
            set_term(&mut constraint.terms, var, coefficient);
        }
    }

    /// Set the objective coefficient of `var`, replacing any previous value.
    pub fn set_objective_coefficient(&mut self, var: VarHandle, coefficient: f64) {
        set_term(&mut self.objective, var, coefficient);
    }

    /// Minimise the objective.
    pub fn set_minimise(&mut self) {
        self.sense = Sense::Minimise;
    }

    /// Maximise the objective.
    pub fn set_maximise(&mut self) {
        self.sense = Sense::Maximise;
    }

    /// Optimisation direction
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// All variables, indexed by [`VarHandle::index`].
    pub fn variables(&self) -> &[ModelVariable] {
        &self.variables
    }

    /// Get a variable by handle.
    pub fn variable(&self, var: VarHandle) -> Option<&ModelVariable> {
        self.variables.get(var.index())
    }

    /// All constraints, in insertion order.
    pub fn constraints(&self) -> &[ModelConstraint] {
        &self.constraints
    }

    /// Get a constraint by handle.
    pub fn constraint(&self, constraint: ConstraintHandle) -> Option<&ModelConstraint> {
        self.constraints.get(constraint.index())
    }

    /// Objective terms, in insertion order.
    pub fn objective(&self) -> &[(VarHandle, f64)] {
        &self.objective
    }

    /// Evaluate the objective for the given variable values.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|(var, coefficient)| coefficient * values.get(var.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// Whether `values` respects every variable bound and constraint, within `tolerance`.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }

        let within_bounds = self
            .variables
            .iter()
            .zip(values)
            .all(|(var, &value)| value >= var.lower - tolerance && value <= var.upper + tolerance);

        within_bounds
            && self
                .constraints
                .iter()
                .all(|constraint| constraint.is_satisfied_by(values, tolerance))
    }
}

fn set_term(terms: &mut Vec<(VarHandle, f64)>, var: VarHandle, coefficient: f64) {
    match terms.iter_mut().find(|(existing, _)| *existing == var) {
        Some(term) => term.1 = coefficient,
        None => terms.push((var, coefficient)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_index_in_insertion_order() {
        let mut model = MipModel::new("test");

        let x = model.add_integer_variable(0.0, 5.0, "x");
        let u = model.add_boolean_variable("u");

        assert_eq!(x.index(), 0);
        assert_eq!(u.index(), 1);
        assert_eq!(model.variable(u).map(|v| v.kind), Some(VariableKind::Boolean));
    }

    #[test]
    fn set_coefficient_replaces_existing_term() {
        let mut model = MipModel::new("test");
        let x = model.add_integer_variable(0.0, 5.0, "x");
        let c = model.add_constraint(0.0, 3.0);

        model.set_coefficient(c, x, 1.0);
        model.set_coefficient(c, x, 2.0);

        assert_eq!(
            model.constraint(c).map(|c| c.terms.clone()),
            Some(vec![(x, 2.0)])
        );
    }

    #[test]
    fn satisfaction_checks_bounds_and_constraints() {
        let mut model = MipModel::new("test");
        let x = model.add_integer_variable(0.0, 5.0, "x");
        let y = model.add_integer_variable(0.0, 5.0, "y");
        let c = model.add_constraint(f64::NEG_INFINITY, 6.0);
        model.set_coefficient(c, x, 1.0);
        model.set_coefficient(c, y, 1.0);

        assert!(model.is_satisfied_by(&[3.0, 3.0], 1e-9));
        assert!(!model.is_satisfied_by(&[4.0, 3.0], 1e-9));
        assert!(!model.is_satisfied_by(&[6.0, 0.0], 1e-9));
        assert!(!model.is_satisfied_by(&[1.0], 1e-9));
    }

    #[test]
    fn objective_value_sums_terms() {
        let mut model = MipModel::new("test");
        let x = model.add_integer_variable(0.0, 5.0, "x");
        let u = model.add_boolean_variable("u");
        model.set_objective_coefficient(u, 1.0);
        model.set_objective_coefficient(x, 0.5);

        assert!((model.objective_value(&[4.0, 1.0]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn debug_summarises_sizes() {
        let mut model = MipModel::new("picklist");
        model.add_boolean_variable("u");

        let formatted = format!("{model:?}");

        assert!(formatted.contains("MipModel"));
        assert!(formatted.contains("1 variables"));
        assert!(formatted.contains("0 constraints"));
    }
}
