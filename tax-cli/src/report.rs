//! Plain-text rendering of estimates, curves and the bracket schedule.
//!
//! Local-currency amounts use es-CL grouping (`16.168.447,04`); foreign
//! amounts are shown alongside with two decimals.

use std::io::{self, Write};

use rust_decimal::Decimal;
use tax_core::{BracketPlacement, BracketTable, Scenario, ScenarioRequest, YieldCurvePoint};
use tax_data::ExchangeRate;

use crate::app::{BatchEntry, EstimateReport};
use crate::utils::{format_amount, format_bound, format_percent};

const LOCAL: &str = "CLP";
const FOREIGN: &str = "USD";

fn foreign(
    request: &ScenarioRequest,
    amount: Decimal,
) -> String {
    request
        .to_foreign(amount)
        .map(|value| format!("{} {FOREIGN}", format_amount(value)))
        .unwrap_or_else(|| format!("n/a {FOREIGN}"))
}

/// One line describing where the resolved rate came from.
pub fn write_rate<W: Write>(
    out: &mut W,
    rate: &ExchangeRate,
) -> io::Result<()> {
    write!(out, "Exchange rate: {} {LOCAL}/{FOREIGN} ({}", format_amount(rate.value), rate.source)?;
    if let Some(observed_at) = rate.observed_at {
        write!(out, ", observed {}", observed_at.format("%Y-%m-%d"))?;
    }
    writeln!(out, ")")
}

fn write_scenario<W: Write>(
    out: &mut W,
    title: &str,
    request: &ScenarioRequest,
    scenario: &Scenario,
) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(
        out,
        "  Extra income:     {} {LOCAL} ({})",
        format_amount(scenario.extra_amount),
        foreign(request, scenario.extra_amount)
    )?;
    writeln!(out, "  Incremental tax:  {} {LOCAL}", format_amount(scenario.incremental_tax))?;
    writeln!(
        out,
        "  Net benefit:      {} {LOCAL} ({})",
        format_amount(scenario.net_benefit),
        foreign(request, scenario.net_benefit)
    )?;
    writeln!(out, "  Effective yield:  {}", format_percent(scenario.yield_percent))
}

fn write_placement<W: Write>(
    out: &mut W,
    label: &str,
    placement: &BracketPlacement,
) -> io::Result<()> {
    let bracket = &placement.bracket;
    writeln!(out, "  {label}: {} {LOCAL}", format_amount(placement.income))?;
    writeln!(
        out,
        "    bracket #{}: {} to {} {LOCAL}, factor {}, deduction {} {LOCAL}",
        placement.index,
        format_amount(bracket.lower),
        format_bound(bracket.upper),
        bracket.factor.normalize(),
        format_amount(bracket.deduction)
    )
}

/// Full report for one request: both scenarios, bracket placements and,
/// when `with_curve` is set, the sampled yield curve.
pub fn write_estimate<W: Write>(
    out: &mut W,
    report: &EstimateReport,
    with_curve: bool,
) -> io::Result<()> {
    let request = &report.request;
    let set = &report.scenarios;

    writeln!(
        out,
        "Stock total: {} {LOCAL} ({})",
        format_amount(set.full.extra_amount),
        foreign(request, set.full.extra_amount)
    )?;
    writeln!(out)?;
    write_scenario(out, "Full exercise", request, &set.full)?;
    writeln!(out)?;
    write_scenario(out, "Optimal exercise (stays in current bracket)", request, &set.optimal)?;
    writeln!(out)?;

    writeln!(out, "Brackets")?;
    write_placement(out, "Annual base income", &set.base)?;
    write_placement(out, "With full exercise", &set.full.resulting)?;
    write_placement(out, "With optimal exercise", &set.optimal.resulting)?;
    if set.full_crosses_bracket() {
        writeln!(
            out,
            "  Full exercise moves income from bracket #{} to #{}.",
            set.base.index, set.full.resulting.index
        )?;
    }

    if with_curve {
        writeln!(out)?;
        write_curve(out, &report.curve)?;
    }
    Ok(())
}

/// Yield curve as an aligned table.
pub fn write_curve<W: Write>(
    out: &mut W,
    points: &[YieldCurvePoint],
) -> io::Result<()> {
    writeln!(
        out,
        "{:>5}  {:>20}  {:>20}  {:>20}  {:>8}",
        "%", "gross extra", "incremental tax", "net extra", "yield"
    )?;
    for point in points {
        writeln!(
            out,
            "{:>5}  {:>20}  {:>20}  {:>20}  {:>8}",
            point.percent().normalize(),
            format_amount(point.gross_extra),
            format_amount(point.incremental_tax),
            format_amount(point.net_extra),
            format_percent(point.yield_percent())
        )?;
    }
    Ok(())
}

/// The bracket schedule, one row per bracket.
pub fn write_brackets<W: Write>(
    out: &mut W,
    table: &BracketTable,
) -> io::Result<()> {
    writeln!(
        out,
        "{:>2}  {:>18}  {:>18}  {:>6}  {:>16}",
        "#", "from", "to", "factor", "deduction"
    )?;
    for (i, bracket) in table.iter().enumerate() {
        writeln!(
            out,
            "{:>2}  {:>18}  {:>18}  {:>6}  {:>16}",
            i + 1,
            format_amount(bracket.lower),
            format_bound(bracket.upper),
            bracket.factor.normalize(),
            format_amount(bracket.deduction)
        )?;
    }
    Ok(())
}

/// One summary line per batch row.
pub fn write_batch<W: Write>(
    out: &mut W,
    entries: &[BatchEntry],
) -> io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:>18}  {:>18}  {:>9}  {:>18}  {:>9}  {:>7}",
        "row", "annual base", "full net", "full %", "optimal extra", "opt. %", "bracket"
    )?;
    for entry in entries {
        match &entry.outcome {
            Ok(report) => {
                let set = &report.scenarios;
                writeln!(
                    out,
                    "{:>4}  {:>18}  {:>18}  {:>9}  {:>18}  {:>9}  {:>7}",
                    entry.row,
                    format_amount(set.base.income),
                    format_amount(set.full.net_benefit),
                    format_percent(set.full.yield_percent),
                    format_amount(set.optimal.extra_amount),
                    format_percent(set.optimal.yield_percent),
                    format!("{}->{}", set.base.index, set.full.resulting.index)
                )?;
            }
            Err(error) => writeln!(out, "{:>4}  error: {error}", entry.row)?,
        }
    }
    Ok(())
}
