#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Malformed rates fall back to zero; only broken JSON may error.
        if let Ok(table) = fatura::config::load_tax_table(s) {
            for kind in fatura::impostos::TaxKind::ALL {
                let (parts, services) = table.side_rates(kind);
                assert!(parts >= rust_decimal::Decimal::ZERO);
                assert!(services >= rust_decimal::Decimal::ZERO);
            }
        }
    }
});
