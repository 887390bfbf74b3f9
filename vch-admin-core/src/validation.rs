//! Declarative numeric validation for the compute-capacity form.
//!
//! Each field carries required-ness, an integer pattern (the limit fields
//! also accept an `Unlimited` sentinel) and a minimum of 1. Limit and
//! reservation fields are additionally bounded by the matching
//! `ResourceAllocationInfo.max_usage`, which changes whenever the selected
//! compute resource changes — the bound is looked up at check time, never
//! baked into the rule.

use crate::config::FieldDefaults;
use crate::types::ResourceAllocationInfo;

/// The six numeric fields of the compute-capacity form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacityField {
    CpuLimit,
    MemoryLimit,
    CpuReservation,
    MemoryReservation,
    CpuShares,
    MemoryShares,
}

impl CapacityField {
    pub const ALL: [CapacityField; 6] = [
        CapacityField::CpuLimit,
        CapacityField::MemoryLimit,
        CapacityField::CpuReservation,
        CapacityField::MemoryReservation,
        CapacityField::CpuShares,
        CapacityField::MemoryShares,
    ];

    /// Stable key for error reporting and logging.
    pub fn key(self) -> &'static str {
        match self {
            CapacityField::CpuLimit => "cpu_limit",
            CapacityField::MemoryLimit => "memory_limit",
            CapacityField::CpuReservation => "cpu_reservation",
            CapacityField::MemoryReservation => "memory_reservation",
            CapacityField::CpuShares => "cpu_shares",
            CapacityField::MemoryShares => "memory_shares",
        }
    }

    fn index(self) -> usize {
        match self {
            CapacityField::CpuLimit => 0,
            CapacityField::MemoryLimit => 1,
            CapacityField::CpuReservation => 2,
            CapacityField::MemoryReservation => 3,
            CapacityField::CpuShares => 4,
            CapacityField::MemoryShares => 5,
        }
    }

    pub fn is_limit(self) -> bool {
        matches!(self, CapacityField::CpuLimit | CapacityField::MemoryLimit)
    }

    pub fn is_reservation(self) -> bool {
        matches!(
            self,
            CapacityField::CpuReservation | CapacityField::MemoryReservation
        )
    }

    pub fn is_shares(self) -> bool {
        matches!(self, CapacityField::CpuShares | CapacityField::MemoryShares)
    }

    pub fn is_cpu(self) -> bool {
        matches!(
            self,
            CapacityField::CpuLimit | CapacityField::CpuReservation | CapacityField::CpuShares
        )
    }

    /// Reservation and shares fields only participate in advanced mode.
    pub fn advanced_only(self) -> bool {
        !self.is_limit()
    }
}

/// A single validation failure. At most one is reported per field, in
/// required > pattern > min > max precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    Pattern,
    BelowMinimum { min: i64 },
    AboveMaximum { max: i64 },
}

impl std::fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldErrorKind::Required => write!(f, "value is required"),
            FieldErrorKind::Pattern => write!(f, "value must be a whole number"),
            FieldErrorKind::BelowMinimum { min } => write!(f, "value must be at least {min}"),
            FieldErrorKind::AboveMaximum { max } => write!(f, "value must not exceed {max}"),
        }
    }
}

/// Static part of a field's constraint; the dynamic maximum is supplied at
/// check time.
#[derive(Debug, Clone, Copy)]
pub struct NumericRule {
    pub required: bool,
    pub allow_unlimited: bool,
    pub min: i64,
}

impl NumericRule {
    pub fn check(&self, value: &str, max: Option<i64>) -> Option<FieldErrorKind> {
        let value = value.trim();
        if value.is_empty() {
            return self.required.then_some(FieldErrorKind::Required);
        }
        if self.allow_unlimited && value.eq_ignore_ascii_case("unlimited") {
            return None;
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Some(FieldErrorKind::Pattern);
        }
        let parsed: i64 = match value.parse() {
            Ok(v) => v,
            // Digits only but out of range still fails the pattern.
            Err(_) => return Some(FieldErrorKind::Pattern),
        };
        if parsed < self.min {
            return Some(FieldErrorKind::BelowMinimum { min: self.min });
        }
        if let Some(max) = max {
            if parsed > max {
                return Some(FieldErrorKind::AboveMaximum { max });
            }
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldState {
    value: String,
    touched: bool,
    error: Option<FieldErrorKind>,
}

/// Form state for the six capacity fields.
///
/// Basic mode activates the two limit fields; advanced mode activates all
/// six. Toggling modes re-evaluates validity but never discards entered
/// values. Errors are recomputed on every value change, mode toggle, and
/// allocation-bounds refresh; `touched` only gates what the UI surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityForm {
    advanced: bool,
    states: [FieldState; 6],
    bounds: Option<ResourceAllocationInfo>,
}

impl CapacityForm {
    pub fn new(defaults: &FieldDefaults, advanced: bool) -> Self {
        let mut form = Self {
            advanced,
            states: Default::default(),
            bounds: None,
        };
        for field in CapacityField::ALL {
            form.states[field.index()].value = defaults.value(field).to_string();
        }
        form.revalidate_all();
        form
    }

    pub fn advanced(&self) -> bool {
        self.advanced
    }

    /// Whether a field participates in validation under the current mode.
    pub fn is_active(&self, field: CapacityField) -> bool {
        self.advanced || !field.advanced_only()
    }

    pub fn value(&self, field: CapacityField) -> &str {
        &self.states[field.index()].value
    }

    pub fn error(&self, field: CapacityField) -> Option<FieldErrorKind> {
        self.states[field.index()].error
    }

    pub fn is_touched(&self, field: CapacityField) -> bool {
        self.states[field.index()].touched
    }

    pub fn bounds(&self) -> Option<&ResourceAllocationInfo> {
        self.bounds.as_ref()
    }

    /// Record operator input. Marks the field touched and re-evaluates it.
    pub fn set_value(&mut self, field: CapacityField, value: impl Into<String>) {
        let state = &mut self.states[field.index()];
        state.value = value.into();
        state.touched = true;
        self.revalidate(field);
    }

    /// Install new allocation bounds and re-evaluate every field against them.
    pub fn set_bounds(&mut self, bounds: Option<ResourceAllocationInfo>) {
        self.bounds = bounds;
        self.revalidate_all();
    }

    /// Switch between basic and advanced mode, keeping entered values.
    pub fn set_advanced(&mut self, advanced: bool) {
        self.advanced = advanced;
        self.revalidate_all();
    }

    pub fn mark_all_touched(&mut self) {
        for state in &mut self.states {
            state.touched = true;
        }
    }

    pub fn is_valid(&self) -> bool {
        CapacityField::ALL.iter().all(|f| self.error(*f).is_none())
    }

    /// Errors of all active fields, in field order.
    pub fn errors(&self) -> Vec<(CapacityField, FieldErrorKind)> {
        CapacityField::ALL
            .iter()
            .filter_map(|&f| self.error(f).map(|e| (f, e)))
            .collect()
    }

    fn rule(&self, field: CapacityField) -> NumericRule {
        NumericRule {
            required: true,
            allow_unlimited: field.is_limit(),
            min: 1,
        }
    }

    /// Dynamic upper bound for a field. Shares are unbounded.
    fn max_for(&self, field: CapacityField) -> Option<i64> {
        if field.is_shares() {
            return None;
        }
        self.bounds.map(|b| {
            if field.is_cpu() {
                b.cpu.max_usage
            } else {
                b.memory.max_usage
            }
        })
    }

    fn revalidate(&mut self, field: CapacityField) {
        let error = if self.is_active(field) {
            let rule = self.rule(field);
            let max = self.max_for(field);
            rule.check(&self.states[field.index()].value, max)
        } else {
            None
        };
        self.states[field.index()].error = error;
    }

    fn revalidate_all(&mut self) {
        for field in CapacityField::ALL {
            self.revalidate(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;
    use crate::types::AllocationUsage;

    const MAX_LIMIT: i64 = 4096;

    fn bounded_form() -> CapacityForm {
        let mut form = CapacityForm::new(&FieldDefaults::default(), true);
        form.set_bounds(Some(ResourceAllocationInfo {
            cpu: AllocationUsage {
                max_usage: MAX_LIMIT,
                unreserved_for_pool: MAX_LIMIT,
            },
            memory: AllocationUsage {
                max_usage: MAX_LIMIT,
                unreserved_for_pool: MAX_LIMIT,
            },
        }));
        form
    }

    #[test_case(CapacityField::CpuLimit)]
    #[test_case(CapacityField::MemoryLimit)]
    #[test_case(CapacityField::CpuReservation)]
    #[test_case(CapacityField::MemoryReservation)]
    #[test_case(CapacityField::CpuShares)]
    #[test_case(CapacityField::MemoryShares)]
    fn field_error_progression(field: CapacityField) {
        let mut form = bounded_form();

        form.set_value(field, "");
        assert_eq!(form.error(field), Some(FieldErrorKind::Required));

        form.set_value(field, "test");
        assert_eq!(form.error(field), Some(FieldErrorKind::Pattern));

        form.set_value(field, "0");
        assert_eq!(
            form.error(field),
            Some(FieldErrorKind::BelowMinimum { min: 1 })
        );

        form.set_value(field, "1");
        assert_eq!(form.error(field), None);
    }

    #[test_case(CapacityField::CpuLimit)]
    #[test_case(CapacityField::MemoryLimit)]
    #[test_case(CapacityField::CpuReservation)]
    #[test_case(CapacityField::MemoryReservation)]
    fn bounded_fields_reject_values_above_max_usage(field: CapacityField) {
        let mut form = bounded_form();
        form.set_value(field, (MAX_LIMIT + 1).to_string());
        assert_eq!(
            form.error(field),
            Some(FieldErrorKind::AboveMaximum { max: MAX_LIMIT })
        );

        form.set_value(field, MAX_LIMIT.to_string());
        assert_eq!(form.error(field), None);
    }

    #[test_case(CapacityField::CpuShares)]
    #[test_case(CapacityField::MemoryShares)]
    fn shares_have_no_dynamic_maximum(field: CapacityField) {
        let mut form = bounded_form();
        form.set_value(field, (MAX_LIMIT * 100).to_string());
        assert_eq!(form.error(field), None);
    }

    #[test_case(CapacityField::CpuLimit, None; "cpu limit accepts the sentinel")]
    #[test_case(CapacityField::MemoryLimit, None; "memory limit accepts the sentinel")]
    #[test_case(CapacityField::CpuReservation, Some(FieldErrorKind::Pattern); "cpu reservation rejects the sentinel")]
    #[test_case(CapacityField::CpuShares, Some(FieldErrorKind::Pattern); "cpu shares rejects the sentinel")]
    fn unlimited_sentinel_is_limit_only(field: CapacityField, expected: Option<FieldErrorKind>) {
        let mut form = bounded_form();
        form.set_value(field, "Unlimited");
        assert_eq!(form.error(field), expected);
        form.set_value(field, "unlimited");
        assert_eq!(form.error(field), expected);
    }

    #[test]
    fn negative_and_overflowing_input_fail_the_pattern() {
        let mut form = bounded_form();
        form.set_value(CapacityField::CpuLimit, "-1");
        assert_eq!(
            form.error(CapacityField::CpuLimit),
            Some(FieldErrorKind::Pattern)
        );
        form.set_value(CapacityField::CpuLimit, "99999999999999999999999999");
        assert_eq!(
            form.error(CapacityField::CpuLimit),
            Some(FieldErrorKind::Pattern)
        );
    }

    #[test]
    fn no_maximum_applies_until_bounds_arrive() {
        let mut form = CapacityForm::new(&FieldDefaults::default(), true);
        form.set_value(CapacityField::CpuLimit, (MAX_LIMIT + 1).to_string());
        assert_eq!(form.error(CapacityField::CpuLimit), None);

        form.set_bounds(Some(ResourceAllocationInfo {
            cpu: AllocationUsage {
                max_usage: MAX_LIMIT,
                unreserved_for_pool: MAX_LIMIT,
            },
            memory: AllocationUsage {
                max_usage: MAX_LIMIT,
                unreserved_for_pool: MAX_LIMIT,
            },
        }));
        assert_eq!(
            form.error(CapacityField::CpuLimit),
            Some(FieldErrorKind::AboveMaximum { max: MAX_LIMIT })
        );
    }

    #[test]
    fn basic_mode_ignores_advanced_fields_without_discarding_them() {
        let mut form = bounded_form();
        form.set_value(CapacityField::CpuReservation, "not a number");
        assert_eq!(
            form.error(CapacityField::CpuReservation),
            Some(FieldErrorKind::Pattern)
        );

        form.set_advanced(false);
        assert_eq!(form.error(CapacityField::CpuReservation), None);
        assert_eq!(form.value(CapacityField::CpuReservation), "not a number");
        assert!(form.is_valid());

        form.set_advanced(true);
        assert_eq!(
            form.error(CapacityField::CpuReservation),
            Some(FieldErrorKind::Pattern)
        );
    }

    #[test]
    fn touched_state_tracks_interaction() {
        let mut form = bounded_form();
        assert!(!form.is_touched(CapacityField::CpuLimit));
        form.set_value(CapacityField::CpuLimit, "2");
        assert!(form.is_touched(CapacityField::CpuLimit));

        let mut fresh = bounded_form();
        fresh.mark_all_touched();
        assert!(CapacityField::ALL.iter().all(|&f| fresh.is_touched(f)));
    }

    #[test]
    fn reservation_above_limit_is_not_rejected() {
        // Cross-field reservation <= limit is a known relaxed constraint.
        let mut form = bounded_form();
        form.set_value(CapacityField::CpuLimit, "10");
        form.set_value(CapacityField::CpuReservation, "100");
        assert!(form.is_valid());
    }

    proptest! {
        #[test]
        fn values_within_bounds_validate_clean(v in 1..=MAX_LIMIT) {
            let mut form = bounded_form();
            for field in CapacityField::ALL {
                form.set_value(field, v.to_string());
                prop_assert_eq!(form.error(field), None);
            }
        }

        #[test]
        fn values_above_bounds_fail_bounded_fields(v in (MAX_LIMIT + 1)..i64::MAX / 2) {
            let mut form = bounded_form();
            for field in CapacityField::ALL {
                form.set_value(field, v.to_string());
                if field.is_shares() {
                    prop_assert_eq!(form.error(field), None);
                } else {
                    prop_assert_eq!(
                        form.error(field),
                        Some(FieldErrorKind::AboveMaximum { max: MAX_LIMIT })
                    );
                }
            }
        }
    }
}
