use std::collections::BTreeMap;

use nalgebra::DVector;

use camber_types::{ParamShape, ParamValue};

/// Description of one framework-facing input or output slot.
#[derive(Debug, Clone)]
pub struct VariableSpec {
    pub name: String,
    pub shape: ParamShape,
    /// Value at setup time; the framework seeds its containers from this.
    pub initial: ParamValue,
}

/// Ordered name→value container passed across the framework boundary.
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
    values: BTreeMap<String, ParamValue>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a set from variable specs, using each spec's initial value.
    pub fn from_specs(specs: &[VariableSpec]) -> Self {
        let mut set = Self::new();
        for spec in specs {
            set.set(spec.name.clone(), spec.initial.clone());
        }
        set
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    pub fn set_scalar(&mut self, name: impl Into<String>, value: f64) {
        self.set(name, ParamValue::Scalar(value));
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ParamValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn vector(&self, name: &str) -> Option<&DVector<f64>> {
        match self.values.get(name) {
            Some(ParamValue::Vector(v)) => Some(v),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
