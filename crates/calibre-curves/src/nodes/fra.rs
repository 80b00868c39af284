//! FRA curve node.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use calibre_core::calendars::BusinessDayConvention;
use calibre_core::market_data::{MarketData, QuoteId};
use calibre_core::reference_data::{CalendarId, ReferenceData};
use calibre_core::types::{Date, IborIndex};

use crate::curves::ValueType;
use crate::definition::CurveNode;
use crate::error::CurveResult;
use crate::instruments::{ResolvedFra, ResolvedTrade};

/// Conventions of a FRA, e.g. `3Mx6M` on a 3M index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraTemplate {
    /// Index the FRA fixes against; its tenor is the accrual length.
    pub index: IborIndex,
    /// Months from spot to the accrual start.
    pub months_to_start: i32,
    /// Business days from trade date to spot.
    pub spot_days: i32,
    /// Adjustment of the accrual dates.
    pub business_day_convention: BusinessDayConvention,
    /// Calendar for spot lag and adjustment.
    pub calendar: CalendarId,
}

impl FraTemplate {
    /// Creates a template with modified following adjustment on the weekend
    /// calendar.
    #[must_use]
    pub fn new(index: IborIndex, months_to_start: i32, spot_days: i32) -> Self {
        Self {
            index,
            months_to_start,
            spot_days,
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

    /// Months from spot to the accrual end.
    fn months_to_end(&self) -> i32 {
        self.months_to_start + self.index.tenor().months()
    }

    /// Accrual start and end dates for a trade date.
    fn dates(&self, trade_date: Date, ref_data: &dyn ReferenceData) -> CurveResult<(Date, Date)> {
        let calendar = ref_data.calendar(&self.calendar)?;
        let spot = calendar.add_business_days(trade_date, self.spot_days);
        let start = calendar.adjust(
            spot.add_months(self.months_to_start)?,
            self.business_day_convention,
        );
        let end = calendar.adjust(
            spot.add_months(self.months_to_end())?,
            self.business_day_convention,
        );
        Ok((start, end))
    }
}

/// Curve node backed by a quoted FRA rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FraCurveNode {
    template: FraTemplate,
    quote_id: QuoteId,
    additional_spread: f64,
    label: String,
}

impl FraCurveNode {
    /// Creates a node labelled `<start>Mx<end>M`.
    #[must_use]
    pub fn new(template: FraTemplate, quote_id: QuoteId) -> Self {
        let label = format!("{}Mx{}M", template.months_to_start, template.months_to_end());
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
    pub fn template(&self) -> &FraTemplate {
        &self.template
    }
}

impl CurveNode for FraCurveNode {
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
        let fixed_rate = market_data.value(&self.quote_id)? + self.additional_spread;
        let (start_date, end_date) = self.template.dates(valuation_date, ref_data)?;
        let index = self.template.index;
        Ok(ResolvedFra {
            index,
            fixing_date: start_date,
            start_date,
            end_date,
            year_fraction: index.day_count().year_fraction_f64(start_date, end_date),
            fixed_rate,
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
        Ok(value_type.from_rate(rate, f64::from(self.template.months_to_end()) / 12.0))
    }
}
