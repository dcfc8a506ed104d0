use bevy::prelude::*;

/// One named variable of a known kind.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct Variable<T> {
    pub name: String,
    pub value: T,
}

impl<T> Variable<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Kind tag for variable references and the variables-tab kind column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum VariableKind {
    Float,
    Int,
    Bool,
    Text,
    Vec2,
    Vec3,
    Quat,
    Rect,
    Color,
    Entity,
}

impl VariableKind {
    /// Short column tag shown in the variables tab.
    pub fn tag(self) -> &'static str {
        match self {
            VariableKind::Float => "FLOAT",
            VariableKind::Int => "INT",
            VariableKind::Bool => "BOOL",
            VariableKind::Text => "TEXT",
            VariableKind::Vec2 => "VEC2",
            VariableKind::Vec3 => "VEC3",
            VariableKind::Quat => "QUAT",
            VariableKind::Rect => "RECT",
            VariableKind::Color => "COLOR",
            VariableKind::Entity => "ENTITY",
        }
    }
}

/// The graph's declared variables, grouped by kind.
///
/// Float, int, bool, and text entries are editable in the variables tab;
/// the geometric and color kinds display read-only; entity entries are
/// navigation links.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct Variables {
    pub floats: Vec<Variable<f32>>,
    pub ints: Vec<Variable<i32>>,
    pub bools: Vec<Variable<bool>>,
    pub texts: Vec<Variable<String>>,
    pub vec2s: Vec<Variable<Vec2>>,
    pub vec3s: Vec<Variable<Vec3>>,
    pub quats: Vec<Variable<Quat>>,
    pub rects: Vec<Variable<Rect>>,
    pub colors: Vec<Variable<Color>>,
    pub entities: Vec<Variable<Option<Entity>>>,
}

impl Variables {
    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
            && self.ints.is_empty()
            && self.bools.is_empty()
            && self.texts.is_empty()
            && self.vec2s.is_empty()
            && self.vec3s.is_empty()
            && self.quats.is_empty()
            && self.rects.is_empty()
            && self.colors.is_empty()
            && self.entities.is_empty()
    }

    /// Display string for a referenced variable, or `None` when the name
    /// is not declared under that kind.
    pub fn value_of(&self, reference: &super::VariableRef) -> Option<String> {
        fn find<T, F: Fn(&T) -> String>(
            entries: &[Variable<T>],
            name: &str,
            fmt: F,
        ) -> Option<String> {
            entries
                .iter()
                .find(|v| v.name == name)
                .map(|v| fmt(&v.value))
        }

        let name = reference.name.as_str();
        match reference.kind {
            VariableKind::Float => find(&self.floats, name, |v| v.to_string()),
            VariableKind::Int => find(&self.ints, name, |v| v.to_string()),
            VariableKind::Bool => find(&self.bools, name, |v| v.to_string()),
            VariableKind::Text => find(&self.texts, name, |v| v.clone()),
            VariableKind::Vec2 => find(&self.vec2s, name, |v| format!("({}, {})", v.x, v.y)),
            VariableKind::Vec3 => {
                find(&self.vec3s, name, |v| format!("({}, {}, {})", v.x, v.y, v.z))
            }
            VariableKind::Quat => find(&self.quats, name, |v| format!("{v:?}")),
            VariableKind::Rect => find(&self.rects, name, |v| format!("{v:?}")),
            VariableKind::Color => find(&self.colors, name, |v| format!("{v:?}")),
            VariableKind::Entity => find(&self.entities, name, |v| match v {
                Some(entity) => format!("{entity:?}"),
                None => "(none)".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::VariableRef;

    #[test]
    fn value_of_matches_kind_and_name() {
        let mut vars = Variables::default();
        vars.floats.push(Variable::new("speed", 4.5));
        vars.texts.push(Variable::new("label", "door".to_string()));

        let speed = VariableRef {
            kind: VariableKind::Float,
            name: "speed".into(),
        };
        assert_eq!(vars.value_of(&speed).unwrap(), "4.5");

        // Same name under the wrong kind is not a match.
        let wrong = VariableRef {
            kind: VariableKind::Int,
            name: "speed".into(),
        };
        assert!(vars.value_of(&wrong).is_none());
    }

    #[test]
    fn unset_entity_variable_displays_none() {
        let mut vars = Variables::default();
        vars.entities.push(Variable::new("target", None));
        let reference = VariableRef {
            kind: VariableKind::Entity,
            name: "target".into(),
        };
        assert_eq!(vars.value_of(&reference).unwrap(), "(none)");
    }
}
