//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Datelike, Days, NaiveDate};
use core_kernel::{BillingMonth, DateRange, Money};
use domain_billing::ServiceAssignment;
use proptest::prelude::*;

use crate::builders::AssignmentBuilder;
use crate::fixtures::{date, month};

/// Strategy for billing months between 2000 and 2099
pub fn billing_month_strategy() -> impl Strategy<Value = BillingMonth> {
    (2000i32..2100i32, 1u32..=12u32).prop_map(|(y, m)| month(y, m))
}

/// Strategy for monthly rates in cents, up to 1,000,000.00
pub fn rate_strategy() -> impl Strategy<Value = Money> {
    (0i64..100_000_000i64).prop_map(Money::from_minor)
}

/// Strategy for a day offset within roughly three years
pub fn day_offset_strategy() -> impl Strategy<Value = u64> {
    0u64..1100u64
}

/// Strategy for calendar dates between 2024-01-01 and early 2027
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    day_offset_strategy().prop_map(|offset| date(2024, 1, 1) + Days::new(offset))
}

/// Strategy for inclusive, bounded date ranges
pub fn date_range_strategy() -> impl Strategy<Value = DateRange> {
    (date_strategy(), 0u64..400u64).prop_map(|(start, len)| DateRange {
        start,
        end: Some(start + Days::new(len)),
    })
}

/// Strategy for valid assignments of client 1
///
/// Billing starts on or after the first of the service start month; about
/// half of the generated assignments carry a stop date.
pub fn assignment_strategy() -> impl Strategy<Value = ServiceAssignment> {
    (
        1i64..1000i64,
        date_strategy(),
        0u64..40u64,
        proptest::option::of(0u64..500u64),
        rate_strategy(),
    )
        .prop_map(|(id, start_month_day, delay, stop_after, rate)| {
            let start_month = BillingMonth::containing(start_month_day);
            let billing_start = start_month.first_day() + Days::new(delay);
            let builder = AssignmentBuilder::new(id)
                .service_start_month(start_month)
                .billing_start(billing_start.year(), billing_start.month(), billing_start.day())
                .rate(rate.amount());
            let builder = match stop_after {
                Some(after) => {
                    let stop = billing_start + Days::new(after);
                    builder.stopped_on(stop.year(), stop.month(), stop.day())
                }
                None => builder,
            };
            builder.build()
        })
}
