//! Term deposit curve node.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use calibre_core::calendars::BusinessDayConvention;
use calibre_core::daycounts::DayCountConvention;
use calibre_core::market_data::{MarketData, QuoteId};
use calibre_core::reference_data::{CalendarId, ReferenceData};
use calibre_core::types::{Currency, Date, Tenor};

use crate::curves::ValueType;
use crate::definition::CurveNode;
use crate::error::CurveResult;
use crate::instruments::{ResolvedTermDeposit, ResolvedTrade};

/// Conventions of a term deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDepositTemplate {
    /// Deposit currency.
    pub currency: Currency,
    /// Term from the spot date.
    pub tenor: Tenor,
    /// Business days from trade date to start.
    pub spot_days: i32,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Adjustment of the end date.
    pub business_day_convention: BusinessDayConvention,
    /// Calendar for spot lag and adjustment.
    pub calendar: CalendarId,
}

impl TermDepositTemplate {
    /// Creates a template with modified following adjustment on the weekend
    /// calendar.
    #[must_use]
    pub fn new(currency: Currency, tenor: Tenor, spot_days: i32, day_count: DayCountConvention) -> Self {
        Self {
            currency,
            tenor,
            spot_days,
            day_count,
            business_day_convention: BusinessDayConvention::ModifiedFollowing,
            calendar: CalendarId::weekend(),
        }
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Start and end dates for a trade date.
    fn dates(&self, trade_date: Date, ref_data: &dyn ReferenceData) -> CurveResult<(Date, Date)> {
        let calendar = ref_data.calendar(&self.calendar)?;
        let start = calendar.add_business_days(trade_date, self.spot_days);
        let end = calendar.adjust(
            start.add_months(self.tenor.months())?,
            self.business_day_convention,
        );
        Ok((start, end))
    }
}

/// Curve node backed by a quoted term deposit rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TermDepositCurveNode {
    template: TermDepositTemplate,
    quote_id: QuoteId,
    additional_spread: f64,
    label: String,
}

impl TermDepositCurveNode {
    /// Creates a node labelled by the tenor.
    #[must_use]
    pub fn new(template: TermDepositTemplate, quote_id: QuoteId) -> Self {
        let label = template.tenor.to_string();
        Self {
            template,
            quote_id,
            additional_spread: 0.0,
            label,
        }
    }

    /// Adds a spread to the quoted rate.
    #[must_use]
    pub fn with_spread(mut self, additional_spread: f64) -> Self {
        self.additional_spread = additional_spread;
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the template.
    #[must_use]
    pub fn template(&self) -> &TermDepositTemplate {
        &self.template
    }

    /// Returns the quote identifier.
    #[must_use]
    pub fn quote_id(&self) -> &QuoteId {
        &self.quote_id
    }
}

impl CurveNode for TermDepositCurveNode {
    fn label(&self) -> &str {
        &self.label
    }

    fn requirements(&self) -> BTreeSet<QuoteId> {
        BTreeSet::from([self.quote_id.clone()])
    }

    fn date(&self, valuation_date: Date, ref_data: &dyn ReferenceData) -> CurveResult<Date> {
        Ok(self.template.dates(valuation_date, ref_data)?.1)
    }

    fn trade(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<ResolvedTrade> {
        let rate = market_data.value(&self.quote_id)? + self.additional_spread;
        let (start_date, end_date) = self.template.dates(valuation_date, ref_data)?;
        Ok(ResolvedTermDeposit {
            currency: self.template.currency,
            start_date,
            end_date,
            year_fraction: self.template.day_count.year_fraction_f64(start_date, end_date),
            rate,
        }
        .into())
    }

    fn initial_guess(
        &self,
        _valuation_date: Date,
        market_data: &dyn MarketData,
        value_type: ValueType,
    ) -> CurveResult<f64> {
        let rate = market_data.value(&self.quote_id)? + self.additional_spread;
        Ok(value_type.from_rate(rate, self.template.tenor.years()))
    }
}
