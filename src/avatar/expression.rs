//! Facial expression slots of an avatar.

/// One named expression and its current weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub name: String,
    /// Binary expressions snap to 0 or 1
    pub is_binary: bool,
    value: f32,
}

impl Expression {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_binary: false,
            value: 0.0,
        }
    }

    #[must_use]
    pub fn binary(mut self, is_binary: bool) -> Self {
        self.is_binary = is_binary;
        self
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    fn set(&mut self, value: f32) {
        let value = value.clamp(0.0, 1.0);
        self.value = if self.is_binary {
            if value > 0.5 { 1.0 } else { 0.0 }
        } else {
            value
        };
    }
}

/// Preset and custom expressions of one avatar.
///
/// Order is preserved: presets first, then customs, each in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ExpressionManager {
    presets: Vec<Expression>,
    customs: Vec<Expression>,
}

impl ExpressionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a preset expression. A name that already exists is ignored.
    pub fn add_preset(&mut self, expression: Expression) {
        if self.get(&expression.name).is_none() {
            self.presets.push(expression);
        }
    }

    /// Registers a custom expression. A name that already exists is ignored.
    pub fn add_custom(&mut self, expression: Expression) {
        if self.get(&expression.name).is_none() {
            self.customs.push(expression);
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Expression> {
        self.presets.iter().chain(self.customs.iter())
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Expression> {
        self.presets
            .iter_mut()
            .chain(self.customs.iter_mut())
            .find(|e| e.name == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|e| e.name.clone()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty() && self.customs.is_empty()
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<f32> {
        self.get(name).map(Expression::value)
    }

    /// Sets one expression. Returns `false` if the name is unknown.
    pub fn set_value(&mut self, name: &str, value: f32) -> bool {
        match self.get_mut(name) {
            Some(expression) => {
                expression.set(value);
                true
            }
            None => false,
        }
    }

    fn reset_all(&mut self) {
        for expression in self.presets.iter_mut().chain(self.customs.iter_mut()) {
            expression.set(0.0);
        }
    }

    /// Zeros every expression, then sets `name` to `value`.
    /// Unknown names leave all values untouched and return `false`.
    pub fn set_exclusive(&mut self, name: &str, value: f32) -> bool {
        if self.get(name).is_none() {
            return false;
        }
        self.reset_all();
        self.set_value(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ExpressionManager {
        let mut m = ExpressionManager::new();
        m.add_preset(Expression::new("happy"));
        m.add_preset(Expression::new("blink").binary(true));
        m.add_custom(Expression::new("smug"));
        m
    }

    #[test]
    fn names_list_presets_before_customs() {
        assert_eq!(manager().names(), vec!["happy", "blink", "smug"]);
    }

    #[test]
    fn exclusive_set_clears_others() {
        let mut m = manager();
        m.set_value("smug", 0.7);
        assert!(m.set_exclusive("happy", 0.4));
        assert_eq!(m.value("happy"), Some(0.4));
        assert_eq!(m.value("smug"), Some(0.0));
    }

    #[test]
    fn unknown_name_changes_nothing() {
        let mut m = manager();
        m.set_value("happy", 1.0);
        assert!(!m.set_exclusive("angry", 1.0));
        assert_eq!(m.value("happy"), Some(1.0));
    }

    #[test]
    fn binary_and_range_clamping() {
        let mut m = manager();
        m.set_value("blink", 0.6);
        assert_eq!(m.value("blink"), Some(1.0));
        m.set_value("happy", 3.0);
        assert_eq!(m.value("happy"), Some(1.0));
    }
}
