// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use tracing::debug;
use watchdogs::config::settings::Settings;
use watchdogs::presentation::cli::{self, Cli};
use watchdogs::utils::telemetry;

/// 主函数
///
/// 初始化日志，加载配置并执行命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Load configuration
    let settings = match cli.config.as_deref() {
        Some(path) => Settings::from_file(&path.to_string_lossy())?,
        None => Settings::new()?,
    };
    debug!(?settings, "Configuration loaded");

    // 3. Run command
    cli::run(cli, settings).await
}
