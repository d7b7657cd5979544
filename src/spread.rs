//! The spread calculation: the four derived fields computed for every entry.

/// The four derived fields of a spread entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    /// The absolute transaction amount, `|valor|`.
    pub abs_valor: f64,
    /// The converted amount, `abs_valor × taxa_rec_cliente`.
    pub conversao: f64,
    /// The rate spread, `taxa_rec_cliente − taxa_pgto_banco`.
    pub fator_conversao: f64,
    /// The monetized gain, `fator_conversao × abs_valor`.
    pub ganho: f64,
}

/// Compute the four derived fields from the three raw inputs.
///
/// Pure plain-float arithmetic, no rounding: rounding to storage precision
/// happens at the persistence boundary so that the review step can show
/// unrounded values. The sign of `valor` is discarded before the dependent
/// computations, so negative amounts produce the same results as positive
/// ones.
///
/// Callers must resolve missing values before calling; see
/// [crate::entry::EntryFields::recalculate] for the `Option`-aware wrapper.
pub fn calculate(valor: f64, taxa_rec_cliente: f64, taxa_pgto_banco: f64) -> Derived {
    let abs_valor = valor.abs();
    let fator_conversao = taxa_rec_cliente - taxa_pgto_banco;
    let conversao = abs_valor * taxa_rec_cliente;
    let ganho = fator_conversao * abs_valor;

    Derived {
        abs_valor,
        conversao,
        fator_conversao,
        ganho,
    }
}

/// Round to 2 decimal places, the storage precision for amount columns.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 4 decimal places, the storage precision for rate columns.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod calculate_tests {
    use super::{calculate, round2, round4};

    #[track_caller]
    fn assert_close(got: f64, want: f64) {
        assert!(
            (got - want).abs() < 1e-9,
            "got {got}, want {want} (within 1e-9)"
        );
    }

    #[test]
    fn worked_example() {
        let derived = calculate(-150.00, 0.0500, 0.0300);

        assert_close(derived.abs_valor, 150.00);
        assert_close(derived.fator_conversao, 0.0200);
        assert_close(derived.conversao, 7.50);
        assert_close(derived.ganho, 3.00);
    }

    #[test]
    fn sign_is_discarded() {
        let negative = calculate(-42.5, 0.1, 0.05);
        let positive = calculate(42.5, 0.1, 0.05);

        assert_eq!(negative, positive);
    }

    #[test]
    fn zero_amount_gives_zero_everywhere_except_fator() {
        let derived = calculate(0.0, 0.0500, 0.0300);

        assert_close(derived.abs_valor, 0.0);
        assert_close(derived.conversao, 0.0);
        assert_close(derived.ganho, 0.0);
        assert_close(derived.fator_conversao, 0.02);
    }

    #[test]
    fn invariants_hold_for_assorted_inputs() {
        let cases = [
            (1234.56, 0.0525, 0.0475),
            (-0.01, 1.0, 0.0),
            (99999.99, 0.0001, 0.0002),
        ];

        for (valor, taxa_rec, taxa_banco) in cases {
            let derived = calculate(valor, taxa_rec, taxa_banco);

            assert_close(derived.abs_valor, valor.abs());
            assert_close(derived.fator_conversao, taxa_rec - taxa_banco);
            assert_close(derived.conversao, valor.abs() * taxa_rec);
            assert_close(derived.ganho, (taxa_rec - taxa_banco) * valor.abs());
        }
    }

    #[test]
    fn rounding_matches_storage_precision() {
        let derived = calculate(-150.00, 0.0500, 0.0300);

        // Plain float subtraction leaves residue (0.020000000000000004); the
        // storage rounding removes it.
        assert_eq!(round4(derived.fator_conversao), 0.02);
        assert_eq!(round2(derived.ganho), 3.0);
        assert_eq!(round2(derived.conversao), 7.5);
        assert_eq!(round2(123.456), 123.46);
        assert_eq!(round4(0.123456), 0.1235);
    }
}
