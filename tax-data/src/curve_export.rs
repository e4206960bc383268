//! CSV export of sampled yield curves for external charting.
//!
//! One row per point, monetary columns rounded half-up to two decimals:
//!
//! ```csv
//! percent,gross_extra,incremental_tax,net_extra,yield_percent
//! 0,0.00,0.00,0.00,0.00
//! 10,1000000.00,40000.00,960000.00,96.00
//! ```

use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::YieldCurvePoint;
use tax_core::calculations::common::round_half_up;

#[derive(Debug, Serialize)]
struct CurveRow {
    percent: Decimal,
    gross_extra: Decimal,
    incremental_tax: Decimal,
    net_extra: Decimal,
    yield_percent: Decimal,
}

impl From<&YieldCurvePoint> for CurveRow {
    fn from(point: &YieldCurvePoint) -> Self {
        Self {
            percent: point.percent().normalize(),
            gross_extra: cents(point.gross_extra),
            incremental_tax: cents(point.incremental_tax),
            net_extra: cents(point.net_extra),
            yield_percent: cents(point.yield_percent()),
        }
    }
}

fn cents(value: Decimal) -> Decimal {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    rounded
}

/// Writes `points` as CSV, header included.
pub fn write_curve<W: Write>(
    writer: W,
    points: &[YieldCurvePoint],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in points {
        csv_writer.serialize(CurveRow::from(point))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::calculations::sample_yield_curve;

    use super::*;

    #[test]
    fn write_curve_emits_header_and_rounded_rows() {
        let points = [YieldCurvePoint {
            extra_fraction: dec!(0.3),
            gross_extra: dec!(1234.5678),
            incremental_tax: dec!(49.382712),
            net_extra: dec!(1185.185088),
        }];
        let mut out = Vec::new();

        write_curve(&mut out, &points).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "percent,gross_extra,incremental_tax,net_extra,yield_percent\n\
             30,1234.57,49.38,1185.19,96.00\n"
        );
    }

    #[test]
    fn write_curve_writes_one_row_per_point() {
        let curve = sample_yield_curve(dec!(20000000), dec!(10000000)).unwrap();
        let mut out = Vec::new();

        write_curve(&mut out, &curve).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[1], "0,0.00,0.00,0.00,0.00");
        assert_eq!(lines[2], "10,1000000.00,40000.00,960000.00,96.00");
        assert_eq!(lines[11], "100,10000000.00,630966.40,9369033.60,93.69");
    }

    #[test]
    fn write_curve_with_no_points_writes_nothing() {
        let mut out = Vec::new();

        write_curve(&mut out, &[]).unwrap();

        assert!(out.is_empty());
    }
}
