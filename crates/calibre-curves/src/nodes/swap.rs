//! Fixed versus floating swap curve node.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use calibre_core::calendars::{BusinessDayConvention, Calendar};
use calibre_core::daycounts::DayCountConvention;
use calibre_core::market_data::{MarketData, QuoteId};
use calibre_core::reference_data::{CalendarId, ReferenceData};
use calibre_core::types::{Date, Frequency, RateIndex, Tenor};

use crate::curves::ValueType;
use crate::definition::CurveNode;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{ResolvedFixedPeriod, ResolvedFloatPeriod, ResolvedSwap, ResolvedTrade};

/// Conventions of a fixed versus floating swap.
///
/// The floating index is either a term rate (fixed vs Ibor) or an overnight
/// rate (OIS). The floating leg accrues on the index day count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFloatSwapTemplate {
    /// Floating index.
    pub index: RateIndex,
    /// Maturity from the spot date.
    pub tenor: Tenor,
    /// Fixed leg payment frequency.
    pub fixed_frequency: Frequency,
    /// Fixed leg day count.
    pub fixed_day_count: DayCountConvention,
    /// Floating leg payment frequency.
    pub float_frequency: Frequency,
    /// Business days from trade date to start.
    pub spot_days: i32,
    /// Adjustment of accrual dates.
    pub business_day_convention: BusinessDayConvention,
    /// Calendar for spot lag and adjustment.
    pub calendar: CalendarId,
}

impl FixedFloatSwapTemplate {
    /// Creates a template with modified following adjustment on the weekend
    /// calendar.
    #[must_use]
    pub fn new(
        index: RateIndex,
        tenor: Tenor,
        fixed_frequency: Frequency,
        fixed_day_count: DayCountConvention,
        float_frequency: Frequency,
        spot_days: i32,
    ) -> Self {
        Self {
            index,
            tenor,
            fixed_frequency,
            fixed_day_count,
            float_frequency,
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

    /// Adjusted accrual boundaries from spot to maturity.
    ///
    /// Periods roll forward from spot; a final short stub absorbs any
    /// remainder of the tenor.
    fn schedule(
        &self,
        spot: Date,
        frequency: Frequency,
        calendar: &dyn Calendar,
    ) -> CurveResult<Vec<Date>> {
        let total = self.tenor.months();
        if total <= 0 {
            return Err(CurveError::configuration(format!(
                "swap tenor {} must be positive",
                self.tenor
            )));
        }
        let step = frequency.months_per_period().unwrap_or(total);

        let mut dates = vec![spot];
        let mut months = 0;
        while months < total {
            months = (months + step).min(total);
            let date = calendar.adjust(spot.add_months(months)?, self.business_day_convention);
            dates.push(date);
        }
        Ok(dates)
    }

    fn spot_date(&self, trade_date: Date, calendar: &dyn Calendar) -> Date {
        calendar.add_business_days(trade_date, self.spot_days)
    }

    fn resolve(
        &self,
        trade_date: Date,
        fixed_rate: f64,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<ResolvedSwap> {
        let calendar = ref_data.calendar(&self.calendar)?;
        let spot = self.spot_date(trade_date, calendar.as_ref());

        let fixed_periods = self
            .schedule(spot, self.fixed_frequency, calendar.as_ref())?
            .windows(2)
            .map(|w| ResolvedFixedPeriod {
                start_date: w[0],
                end_date: w[1],
                payment_date: w[1],
                year_fraction: self.fixed_day_count.year_fraction_f64(w[0], w[1]),
            })
            .collect();

        let float_day_count = self.index.day_count();
        let float_periods = self
            .schedule(spot, self.float_frequency, calendar.as_ref())?
            .windows(2)
            .map(|w| ResolvedFloatPeriod {
                fixing_date: w[0],
                start_date: w[0],
                end_date: w[1],
                payment_date: w[1],
                year_fraction: float_day_count.year_fraction_f64(w[0], w[1]),
            })
            .collect();

        ResolvedSwap::new(
            self.index.currency(),
            fixed_rate,
            fixed_periods,
            self.index,
            float_periods,
        )
    }
}

/// Curve node backed by a quoted par swap rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedFloatSwapCurveNode {
    template: FixedFloatSwapTemplate,
    quote_id: QuoteId,
    additional_spread: f64,
    label: String,
}

impl FixedFloatSwapCurveNode {
    /// Creates a node labelled by the tenor.
    #[must_use]
    pub fn new(template: FixedFloatSwapTemplate, quote_id: QuoteId) -> Self {
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
    pub fn template(&self) -> &FixedFloatSwapTemplate {
        &self.template
    }
}

impl CurveNode for FixedFloatSwapCurveNode {
    fn label(&self) -> &str {
        &self.label
    }

    fn requirements(&self) -> BTreeSet<QuoteId> {
        BTreeSet::from([self.quote_id.clone()])
    }

    fn date(&self, valuation_date: Date, ref_data: &dyn ReferenceData) -> CurveResult<Date> {
        let calendar = ref_data.calendar(&self.template.calendar)?;
        let spot = self.template.spot_date(valuation_date, calendar.as_ref());
        Ok(calendar.adjust(
            spot.add_months(self.template.tenor.months())?,
            self.template.business_day_convention,
        ))
    }

    fn trade(
        &self,
        valuation_date: Date,
        market_data: &dyn MarketData,
        ref_data: &dyn ReferenceData,
    ) -> CurveResult<ResolvedTrade> {
        let fixed_rate = market_data.value(&self.quote_id)? + self.additional_spread;
        Ok(self.template.resolve(valuation_date, fixed_rate, ref_data)?.into())
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
