// handlers/elevated/mod.rs - Elevated handlers (PRINCIPAL role)
//
// Institution-wide views and mentor assignment.

pub mod principal;
