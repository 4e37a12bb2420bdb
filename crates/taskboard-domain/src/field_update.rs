/// Three-state update for an optional field in a partial patch.
///
/// - `NoChange`: leave the stored value alone
/// - `Set(value)`: replace it
/// - `Clear`: remove it
///
/// Used where "absent from the patch" and "explicitly cleared" must be told
/// apart, e.g. a card description or a reminder date.
///
/// # Example
///
/// ```
/// use taskboard_domain::FieldUpdate;
///
/// let mut description = Some("draft".to_string());
/// FieldUpdate::Set("final".to_string()).apply_to(&mut description);
/// assert_eq!(description.as_deref(), Some("final"));
///
/// FieldUpdate::<String>::Clear.apply_to(&mut description);
/// assert_eq!(description, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    NoChange,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }

    /// The value this update would leave in place, given the current one.
    pub fn resolve<'a>(&'a self, current: Option<&'a T>) -> Option<&'a T> {
        match self {
            FieldUpdate::NoChange => current,
            FieldUpdate::Set(value) => Some(value),
            FieldUpdate::Clear => None,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some` sets, `None` clears.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change_keeps_value() {
        let mut field = Some(3);
        FieldUpdate::NoChange.apply_to(&mut field);
        assert_eq!(field, Some(3));
        assert!(!FieldUpdate::<i32>::NoChange.is_change());
    }

    #[test]
    fn test_resolve() {
        let current = 1;
        assert_eq!(FieldUpdate::NoChange.resolve(Some(&current)), Some(&1));
        assert_eq!(FieldUpdate::Set(2).resolve(Some(&current)), Some(&2));
        assert_eq!(FieldUpdate::<i32>::Clear.resolve(Some(&current)), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FieldUpdate::from(Some("x")), FieldUpdate::Set("x"));
        assert_eq!(FieldUpdate::<&str>::from(None), FieldUpdate::Clear);
    }
}
