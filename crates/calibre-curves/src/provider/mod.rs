//! Rates providers.
//!
//! [`ImmutableRatesProvider`] is the combined market view the calibrator
//! produces: named curves, the currencies and indices they serve, historic
//! fixings and FX rates. It is never mutated; extending it goes through
//! [`ImmutableRatesProvider::to_builder`], which copies.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use calibre_core::fx::{FxRateProvider, NoFxRateProvider};
use calibre_core::market_data::TimeSeries;
use calibre_core::types::{Currency, Date, RateIndex};

use crate::curves::NodalCurve;
use crate::error::{CurveError, CurveResult};
use crate::names::CurveName;
use crate::sensitivity::CurveParameterSensitivities;

/// Immutable collection of curves keyed by name, currency and index.
#[derive(Clone)]
pub struct ImmutableRatesProvider {
    valuation_date: Date,
    curves: BTreeMap<CurveName, Arc<dyn NodalCurve>>,
    discount_curves: BTreeMap<Currency, CurveName>,
    index_curves: BTreeMap<RateIndex, CurveName>,
    time_series: BTreeMap<RateIndex, TimeSeries>,
    fx_rate_provider: Arc<dyn FxRateProvider>,
}

impl ImmutableRatesProvider {
    /// Starts a builder for the given valuation date.
    #[must_use]
    pub fn builder(valuation_date: Date) -> ImmutableRatesProviderBuilder {
        ImmutableRatesProviderBuilder {
            valuation_date,
            curves: BTreeMap::new(),
            discount_curves: BTreeMap::new(),
            index_curves: BTreeMap::new(),
            time_series: BTreeMap::new(),
            fx_rate_provider: Arc::new(NoFxRateProvider),
        }
    }

    /// A provider with no curves.
    #[must_use]
    pub fn empty(valuation_date: Date) -> Self {
        Self::builder(valuation_date).build()
    }

    /// Returns a builder holding a copy of this provider's content.
    #[must_use]
    pub fn to_builder(&self) -> ImmutableRatesProviderBuilder {
        ImmutableRatesProviderBuilder {
            valuation_date: self.valuation_date,
            curves: self.curves.clone(),
            discount_curves: self.discount_curves.clone(),
            index_curves: self.index_curves.clone(),
            time_series: self.time_series.clone(),
            fx_rate_provider: Arc::clone(&self.fx_rate_provider),
        }
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Returns all curves by name.
    #[must_use]
    pub fn curves(&self) -> &BTreeMap<CurveName, Arc<dyn NodalCurve>> {
        &self.curves
    }

    /// Returns the discount curve name of each currency.
    #[must_use]
    pub fn discount_curves(&self) -> &BTreeMap<Currency, CurveName> {
        &self.discount_curves
    }

    /// Returns the forward curve name of each index.
    #[must_use]
    pub fn index_curves(&self) -> &BTreeMap<RateIndex, CurveName> {
        &self.index_curves
    }

    /// Looks up a curve by name, returning `None` if absent.
    #[must_use]
    pub fn find_curve(&self, name: &CurveName) -> Option<&Arc<dyn NodalCurve>> {
        self.curves.get(name)
    }

    /// Looks up a curve by name.
    pub fn curve(&self, name: &CurveName) -> CurveResult<&Arc<dyn NodalCurve>> {
        self.curves
            .get(name)
            .ok_or_else(|| CurveError::curve_not_found(name.as_str()))
    }

    /// Returns the discount curve of a currency.
    pub fn discount_curve(&self, currency: Currency) -> CurveResult<&Arc<dyn NodalCurve>> {
        let name = self
            .discount_curves
            .get(&currency)
            .ok_or_else(|| CurveError::curve_not_found(format!("discount curve for {currency}")))?;
        self.curve(name)
    }

    /// Returns the forward curve of an index.
    pub fn index_curve(&self, index: RateIndex) -> CurveResult<&Arc<dyn NodalCurve>> {
        let name = self
            .index_curves
            .get(&index)
            .ok_or_else(|| CurveError::curve_not_found(format!("forward curve for {index}")))?;
        self.curve(name)
    }

    /// Returns the discount factor of a currency at a date.
    pub fn discount_factor(&self, currency: Currency, date: Date) -> CurveResult<f64> {
        let curve = self.discount_curve(currency)?;
        curve.discount_factor(curve.year_fraction(self.valuation_date, date))
    }

    /// Returns the sensitivity of [`discount_factor`](Self::discount_factor)
    /// to the discount curve's parameters.
    pub fn discount_factor_sensitivity(
        &self,
        currency: Currency,
        date: Date,
    ) -> CurveResult<CurveParameterSensitivities> {
        let curve = self.discount_curve(currency)?;
        let t = curve.year_fraction(self.valuation_date, date);
        Ok(CurveParameterSensitivities::of(
            curve.name().clone(),
            curve.discount_factor_sensitivity(t)?,
        ))
    }

    /// Returns the simply compounded forward rate of an index over
    /// `[start, end]` with accrual factor `year_fraction`.
    pub fn forward_rate(
        &self,
        index: RateIndex,
        start: Date,
        end: Date,
        year_fraction: f64,
    ) -> CurveResult<f64> {
        let curve = self.index_curve(index)?;
        let df_start = curve.discount_factor(curve.year_fraction(self.valuation_date, start))?;
        let df_end = curve.discount_factor(curve.year_fraction(self.valuation_date, end))?;
        Ok((df_start / df_end - 1.0) / year_fraction)
    }

    /// Returns the sensitivity of [`forward_rate`](Self::forward_rate) to the
    /// forward curve's parameters.
    pub fn forward_rate_sensitivity(
        &self,
        index: RateIndex,
        start: Date,
        end: Date,
        year_fraction: f64,
    ) -> CurveResult<CurveParameterSensitivities> {
        let curve = self.index_curve(index)?;
        let t_start = curve.year_fraction(self.valuation_date, start);
        let t_end = curve.year_fraction(self.valuation_date, end);
        let df_start = curve.discount_factor(t_start)?;
        let df_end = curve.discount_factor(t_end)?;
        let d_start = curve.discount_factor_sensitivity(t_start)?;
        let d_end = curve.discount_factor_sensitivity(t_end)?;

        // F = (Ps/Pe - 1)/τ
        let sensitivity = d_start
            .iter()
            .zip(&d_end)
            .map(|(ds, de)| (ds / df_end - df_start * de / (df_end * df_end)) / year_fraction)
            .collect();
        Ok(CurveParameterSensitivities::of(curve.name().clone(), sensitivity))
    }

    /// Returns the historic fixing of an index on a date, if known.
    #[must_use]
    pub fn fixing(&self, index: RateIndex, date: Date) -> Option<f64> {
        self.time_series.get(&index).and_then(|series| series.get(date))
    }

    /// Returns the fixing history of an index, if any.
    #[must_use]
    pub fn time_series(&self, index: RateIndex) -> Option<&TimeSeries> {
        self.time_series.get(&index)
    }

    /// Returns the number of `counter` units per unit of `base`.
    pub fn fx_rate(&self, base: Currency, counter: Currency) -> CurveResult<f64> {
        Ok(self.fx_rate_provider.fx_rate(base, counter)?)
    }
}

impl fmt::Debug for ImmutableRatesProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableRatesProvider")
            .field("valuation_date", &self.valuation_date)
            .field("curves", &self.curves.keys().collect::<Vec<_>>())
            .field("discount_curves", &self.discount_curves)
            .field("index_curves", &self.index_curves)
            .field("fx_rate_provider", &self.fx_rate_provider)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ImmutableRatesProvider`].
#[derive(Clone)]
pub struct ImmutableRatesProviderBuilder {
    valuation_date: Date,
    curves: BTreeMap<CurveName, Arc<dyn NodalCurve>>,
    discount_curves: BTreeMap<Currency, CurveName>,
    index_curves: BTreeMap<RateIndex, CurveName>,
    time_series: BTreeMap<RateIndex, TimeSeries>,
    fx_rate_provider: Arc<dyn FxRateProvider>,
}

impl ImmutableRatesProviderBuilder {
    /// Adds or replaces a curve without assigning it a role.
    #[must_use]
    pub fn curve(mut self, curve: Arc<dyn NodalCurve>) -> Self {
        self.curves.insert(curve.name().clone(), curve);
        self
    }

    /// Adds a curve and uses it to discount a currency.
    #[must_use]
    pub fn discount_curve(mut self, currency: Currency, curve: Arc<dyn NodalCurve>) -> Self {
        self.discount_curves.insert(currency, curve.name().clone());
        self.curve(curve)
    }

    /// Adds a curve and uses it to project an index.
    #[must_use]
    pub fn index_curve(mut self, index: RateIndex, curve: Arc<dyn NodalCurve>) -> Self {
        self.index_curves.insert(index, curve.name().clone());
        self.curve(curve)
    }

    /// Uses an already added curve to discount a currency.
    #[must_use]
    pub fn discount_curve_name(mut self, currency: Currency, name: CurveName) -> Self {
        self.discount_curves.insert(currency, name);
        self
    }

    /// Uses an already added curve to project an index.
    #[must_use]
    pub fn index_curve_name(mut self, index: RateIndex, name: CurveName) -> Self {
        self.index_curves.insert(index, name);
        self
    }

    /// Adds or replaces the fixing history of an index.
    #[must_use]
    pub fn time_series(mut self, index: RateIndex, series: TimeSeries) -> Self {
        self.time_series.insert(index, series);
        self
    }

    /// Adds or replaces several fixing histories.
    #[must_use]
    pub fn all_time_series(mut self, series: BTreeMap<RateIndex, TimeSeries>) -> Self {
        self.time_series.extend(series);
        self
    }

    /// Sets the FX rate source.
    #[must_use]
    pub fn fx_rate_provider(mut self, fx_rate_provider: Arc<dyn FxRateProvider>) -> Self {
        self.fx_rate_provider = fx_rate_provider;
        self
    }

    /// Returns true if a curve with this name has been added.
    #[must_use]
    pub fn contains_curve(&self, name: &CurveName) -> bool {
        self.curves.contains_key(name)
    }

    /// Builds the provider.
    #[must_use]
    pub fn build(self) -> ImmutableRatesProvider {
        ImmutableRatesProvider {
            valuation_date: self.valuation_date,
            curves: self.curves,
            discount_curves: self.discount_curves,
            index_curves: self.index_curves,
            time_series: self.time_series,
            fx_rate_provider: self.fx_rate_provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{ConstantNodalCurve, CurveMetadata, ParameterMetadata, ValueType};
    use approx::assert_relative_eq;
    use calibre_core::daycounts::DayCountConvention;
    use calibre_core::types::{IborIndex, OvernightIndex, Tenor};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn flat(name: &str, rate: f64) -> Arc<dyn NodalCurve> {
        let metadata = CurveMetadata::new(
            name.into(),
            ValueType::ZeroRate,
            DayCountConvention::Act365Fixed,
            vec![ParameterMetadata::new("flat", date(2027, 1, 4), 1.0)],
        );
        Arc::new(ConstantNodalCurve::new(metadata, rate).unwrap())
    }

    fn provider() -> ImmutableRatesProvider {
        ImmutableRatesProvider::builder(date(2026, 1, 2))
            .discount_curve(Currency::USD, flat("USD-OIS", 0.04))
            .index_curve(OvernightIndex::Sofr.into(), flat("USD-OIS", 0.04))
            .index_curve(IborIndex::TermSofr(Tenor::M3).into(), flat("USD-3M", 0.045))
            .build()
    }

    #[test]
    fn test_discount_factor() {
        let provider = provider();
        let end = date(2027, 1, 2);
        assert_relative_eq!(
            provider.discount_factor(Currency::USD, end).unwrap(),
            (-0.04_f64).exp(),
            epsilon = 1e-15
        );

        let err = provider.discount_factor(Currency::EUR, end).unwrap_err();
        assert!(matches!(err, CurveError::CurveNotFound { .. }));
    }

    #[test]
    fn test_forward_rate_sensitivity_matches_bumping() {
        let provider = provider();
        let index: RateIndex = IborIndex::TermSofr(Tenor::M3).into();
        let (start, end) = (date(2026, 7, 2), date(2026, 10, 2));
        let tau = 92.0 / 360.0;

        let analytic = provider.forward_rate_sensitivity(index, start, end, tau).unwrap();
        let h = 1e-7;
        let bumped = |rate: f64| {
            provider
                .to_builder()
                .index_curve(index, flat("USD-3M", rate))
                .build()
                .forward_rate(index, start, end, tau)
                .unwrap()
        };
        let fd = (bumped(0.045 + h) - bumped(0.045 - h)) / (2.0 * h);

        assert_relative_eq!(analytic.get(&"USD-3M".into()).unwrap()[0], fd, epsilon = 1e-6);
    }

    #[test]
    fn test_to_builder_copies() {
        let base = provider();
        let extended = base
            .to_builder()
            .discount_curve(Currency::EUR, flat("EUR-ESTR", 0.02))
            .build();

        assert!(base.discount_curve(Currency::EUR).is_err());
        assert!(extended.discount_curve(Currency::EUR).is_ok());
        assert_eq!(extended.curves().len(), 3);
    }

    #[test]
    fn test_fixing_lookup() {
        let index: RateIndex = OvernightIndex::Sofr.into();
        let provider = provider()
            .to_builder()
            .time_series(index, TimeSeries::new().with_point(date(2025, 12, 31), 0.0433))
            .build();

        assert_eq!(provider.fixing(index, date(2025, 12, 31)), Some(0.0433));
        assert_eq!(provider.fixing(index, date(2026, 1, 2)), None);
    }
}
