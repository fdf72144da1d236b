//! Client-side commission preview.
//!
//! The formula mirrors the authoritative server computation so the operator
//! sees a live figure while typing, before the backend has computed
//! anything. It is deterministic and total: degenerate inputs produce an
//! all-zero preview instead of an error, because this runs on every
//! keystroke. Where the authoritative figure is also available,
//! [`reconciles_with_authoritative`] must hold; drift between the two is
//! a defect in this mirror, not a rounding choice.

use shared::{CommissionPreviewInput, CommissionPreviewOutput};

/// Tolerance when comparing a preview against the authoritative
/// computation: half a cent.
const RECONCILIATION_EPSILON: f64 = 0.005;

/// Compute the commission preview for one register line.
///
/// `net = gross - gross * tax% / 100`, `total = net * commission% / 100`,
/// `per_seller = total / sellers` (0 when there are no sellers). A gross
/// amount that is zero, negative, or not finite yields the all-zero
/// output.
pub fn preview(input: &CommissionPreviewInput) -> CommissionPreviewOutput {
    if !input.gross_invoiced.is_finite() || input.gross_invoiced <= 0.0 {
        return CommissionPreviewOutput::zero();
    }

    let gross = input.gross_invoiced;
    let net_amount = gross - gross * input.tax_rate_percent / 100.0;
    let total_commission = net_amount * input.commission_rate_percent / 100.0;
    let per_seller_commission = if input.seller_count > 0 {
        total_commission / f64::from(input.seller_count)
    } else {
        0.0
    };

    CommissionPreviewOutput {
        net_amount,
        total_commission,
        per_seller_commission,
    }
}

/// Whether a preview agrees with the authoritative total commission.
pub fn reconciles_with_authoritative(
    preview: &CommissionPreviewOutput,
    authoritative_total_commission: f64,
) -> bool {
    (preview.total_commission - authoritative_total_commission).abs() <= RECONCILIATION_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_worked_example() {
        let output = preview(&CommissionPreviewInput {
            gross_invoiced: 1000.0,
            tax_rate_percent: 21.0,
            commission_rate_percent: 1.0,
            seller_count: 2,
        });

        assert_eq!(output.net_amount, 790.0);
        assert_eq!(output.total_commission, 7.9);
        assert_eq!(output.per_seller_commission, 3.95);
    }

    #[test]
    fn test_preview_uses_configured_defaults() {
        let output = preview(&CommissionPreviewInput::with_defaults(1000.0, 2));
        assert_eq!(output.net_amount, 790.0);
        assert_eq!(output.total_commission, 7.9);
    }

    #[test]
    fn test_preview_zero_gross_is_all_zero() {
        let output = preview(&CommissionPreviewInput::with_defaults(0.0, 2));
        assert_eq!(output, CommissionPreviewOutput::zero());
    }

    #[test]
    fn test_preview_negative_gross_is_all_zero() {
        let output = preview(&CommissionPreviewInput::with_defaults(-500.0, 2));
        assert_eq!(output, CommissionPreviewOutput::zero());
    }

    #[test]
    fn test_preview_non_finite_gross_is_all_zero() {
        let output = preview(&CommissionPreviewInput::with_defaults(f64::NAN, 2));
        assert_eq!(output, CommissionPreviewOutput::zero());
    }

    #[test]
    fn test_preview_zero_sellers_guards_division() {
        let output = preview(&CommissionPreviewInput::with_defaults(1000.0, 0));
        assert_eq!(output.total_commission, 7.9);
        assert_eq!(output.per_seller_commission, 0.0);
    }

    #[test]
    fn test_reconciliation_against_authoritative_figure() {
        let output = preview(&CommissionPreviewInput::with_defaults(1000.0, 2));

        assert!(reconciles_with_authoritative(&output, 7.9));
        assert!(reconciles_with_authoritative(&output, 7.902));
        // A drifted server figure must be flagged
        assert!(!reconciles_with_authoritative(&output, 8.4));
    }
}
