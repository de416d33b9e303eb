// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use watchdogs::utils::telemetry::init_telemetry;

#[test]
fn test_init_telemetry_is_idempotent() {
    init_telemetry();
    init_telemetry();
    tracing::info!("telemetry initialized twice");
}
