//! Condition state shared by the conditional commands.

use crate::expr::ConditionExpr;

/// One WHERE / HAVING / ON slot.
///
/// `None` inputs are no-ops everywhere except [`ConditionSlot::clear`].
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ConditionSlot {
    expr: Option<ConditionExpr>,
}

impl ConditionSlot {
    pub(crate) fn get(&self) -> Option<&ConditionExpr> {
        self.expr.as_ref()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.expr.is_some()
    }

    pub(crate) fn replace(&mut self, new: Option<ConditionExpr>) {
        if let Some(new) = new {
            self.expr = Some(new);
        }
    }

    /// `(prior) AND (new)`, or `new` when empty.
    pub(crate) fn and(&mut self, new: Option<ConditionExpr>) {
        self.combine(new, ConditionExpr::and);
    }

    /// `(prior) OR (new)`, or `new` when empty.
    pub(crate) fn or(&mut self, new: Option<ConditionExpr>) {
        self.combine(new, ConditionExpr::or);
    }

    /// `(prior) AND (NOT new)`, or `NOT new` when empty.
    pub(crate) fn and_not(&mut self, new: Option<ConditionExpr>) {
        self.and(new.map(ConditionExpr::not));
    }

    pub(crate) fn clear(&mut self) {
        self.expr = None;
    }

    fn combine(
        &mut self,
        new: Option<ConditionExpr>,
        op: fn(ConditionExpr, ConditionExpr) -> ConditionExpr,
    ) {
        let Some(new) = new else {
            return;
        };
        self.expr = Some(match self.expr.take() {
            Some(prior) => op(prior, new),
            None => new,
        });
    }
}

/// Generate the WHERE combinators for a command whose condition lives in
/// `self.where_cond`, passing `$fields` to the closures.
macro_rules! impl_where_methods {
    ($fields_ty:ty, $fields:expr) => {
        /// Set the WHERE condition, replacing any previous one.
        ///
        /// A closure returning `None` leaves the condition as it was.
        pub fn filter<F, R>(mut self, f: F) -> Self
        where
            F: FnOnce(&$fields_ty) -> R,
            R: $crate::expr::IntoCondition,
        {
            let fields = $fields;
            self.where_cond.replace($crate::expr::IntoCondition::into_condition(f(&fields)));
            self
        }

        /// Set the WHERE condition from a prebuilt expression.
        pub fn filter_expr(mut self, cond: impl $crate::expr::IntoCondition) -> Self {
            self.where_cond
                .replace($crate::expr::IntoCondition::into_condition(cond));
            self
        }

        /// AND a condition onto the current one: `(prior) AND (new)`.
        pub fn and<F, R>(mut self, f: F) -> Self
        where
            F: FnOnce(&$fields_ty) -> R,
            R: $crate::expr::IntoCondition,
        {
            let fields = $fields;
            self.where_cond.and($crate::expr::IntoCondition::into_condition(f(&fields)));
            self
        }

        /// OR a condition onto the current one: `(prior) OR (new)`.
        pub fn or<F, R>(mut self, f: F) -> Self
        where
            F: FnOnce(&$fields_ty) -> R,
            R: $crate::expr::IntoCondition,
        {
            let fields = $fields;
            self.where_cond.or($crate::expr::IntoCondition::into_condition(f(&fields)));
            self
        }

        /// AND the negation of a condition: `(prior) AND (NOT new)`.
        pub fn not<F, R>(mut self, f: F) -> Self
        where
            F: FnOnce(&$fields_ty) -> R,
            R: $crate::expr::IntoCondition,
        {
            let fields = $fields;
            self.where_cond.and_not($crate::expr::IntoCondition::into_condition(f(&fields)));
            self
        }

        /// Drop the WHERE condition.
        pub fn clear_filter(mut self) -> Self {
            self.where_cond.clear();
            self
        }
    };
}

pub(crate) use impl_where_methods;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Fields;

    fn leaf(name: &str) -> ConditionExpr {
        Fields.field(name).eq(1).build()
    }

    #[test]
    fn first_condition_is_used_as_is() {
        let mut slot = ConditionSlot::default();
        slot.or(Some(leaf("a")));
        assert_eq!(slot.get(), Some(&leaf("a")));
    }

    #[test]
    fn combinators_wrap_the_prior_tree() {
        let mut slot = ConditionSlot::default();
        slot.replace(Some(leaf("a")));
        slot.or(Some(leaf("b")));
        slot.and(Some(leaf("c")));
        let expected = ConditionExpr::and(ConditionExpr::or(leaf("a"), leaf("b")), leaf("c"));
        assert_eq!(slot.get(), Some(&expected));
    }

    #[test]
    fn not_ands_the_negation() {
        let mut slot = ConditionSlot::default();
        slot.and_not(Some(leaf("a")));
        assert_eq!(slot.get(), Some(&ConditionExpr::not(leaf("a"))));
        slot.and_not(Some(leaf("b")));
        assert_eq!(
            slot.get(),
            Some(&ConditionExpr::and(
                ConditionExpr::not(leaf("a")),
                ConditionExpr::not(leaf("b"))
            ))
        );
    }

    #[test]
    fn none_is_a_no_op_and_clear_empties() {
        let mut slot = ConditionSlot::default();
        slot.replace(Some(leaf("a")));
        slot.replace(None);
        slot.and(None);
        slot.or(None);
        slot.and_not(None);
        assert_eq!(slot.get(), Some(&leaf("a")));
        slot.clear();
        assert!(!slot.is_set());
    }
}
