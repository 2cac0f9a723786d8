#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(orders) = fatura::config::load_orders(s) {
            for order in &orders {
                let _ = fatura::core::validate_order(order);
            }
        }
    }
});
