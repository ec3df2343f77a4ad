use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    database_id::UserId,
    transaction::{TransactionStore, TransactionType},
};

/// The number of months covered by the monthly trend, including the current month.
pub const TREND_MONTHS: usize = 6;

/// A user's income and expenses in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrendEntry {
    /// The abbreviated month name, e.g. "Jan".
    pub month: String,
    /// The year and month, e.g. "2025-01".
    pub year_month: String,
    /// The income earned in the month.
    pub income: Decimal,
    /// The expenses paid in the month.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub savings: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn previous(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    fn next(self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }

    fn first_day(self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, 1).ok()
    }

    fn last_day(self) -> Option<Date> {
        self.next().first_day()?.previous_day()
    }
}

/// Total a user's income and expenses for each of the [TREND_MONTHS] calendar
/// months up to and including the month of `as_of`, oldest first.
///
/// Months without any transactions are included with zero totals.
///
/// # Errors
/// This function will return a:
/// - [Error::DateOutOfRange] if the months around `as_of` cannot be represented,
/// - or any error from reading `store`.
pub fn compute_monthly_trend(
    store: &impl TransactionStore,
    user_id: UserId,
    as_of: Date,
) -> Result<Vec<MonthlyTrendEntry>, Error> {
    let mut months = Vec::with_capacity(TREND_MONTHS);
    let mut current = YearMonth::of(as_of);
    for _ in 0..TREND_MONTHS {
        months.push(current);
        current = current.previous();
    }
    months.reverse();

    let (start, end) = match (months[0].first_day(), YearMonth::of(as_of).last_day()) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(Error::DateOutOfRange(as_of)),
    };

    let mut totals = vec![(Decimal::ZERO, Decimal::ZERO); TREND_MONTHS];
    for transaction in store.list_by_user_in_date_range(user_id, start, end)? {
        let month = YearMonth::of(transaction.transaction_date);
        let Some(index) = months.iter().position(|m| *m == month) else {
            continue;
        };

        let (income, expenses) = &mut totals[index];
        match transaction.transaction_type {
            TransactionType::Income => *income += transaction.amount,
            TransactionType::Expense => *expenses += transaction.amount,
        }
    }

    let trend = months
        .into_iter()
        .zip(totals)
        .map(|(month, (income, expenses))| MonthlyTrendEntry {
            month: month_abbrev(month.month).to_owned(),
            year_month: format!("{:04}-{:02}", month.year, u8::from(month.month)),
            income,
            expenses,
            savings: income - expenses,
        })
        .collect();

    Ok(trend)
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
