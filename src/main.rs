// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canopy CLI entrypoint.
//!
//! Builds the configured tree, expands the requested paths against the remote
//! source (in order, each one a toggle) and writes the final view as SVG.

use std::error::Error;

use canopy::controller::{Settled, TransitionSpeed};
use canopy::render::SvgSurface;
use canopy::source::HttpChildSource;
use canopy::{Controller, TreeView, ViewConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] [--root <name>] [--source <url>] [--name-field <field>] [--expand <path>]... [--slow] [--out <file>]\n  {program} --print-schema\n\n--expand toggles the node at a `/`-separated name path starting at the root, e.g. `P1/alice`.\nIt may be repeated; paths are applied in order, fetching children where none are cached.\n--slow uses the slow transition duration for every toggle.\nWithout --out the SVG is written to stdout.\n\nLogging honours RUST_LOG (default `info`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<String>,
    root: Option<String>,
    source: Option<String>,
    name_field: Option<String>,
    expand: Vec<String>,
    slow: bool,
    out: Option<String>,
    print_schema: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    fn set_once(slot: &mut Option<String>, value: Option<String>) -> Result<(), ()> {
        if slot.is_some() {
            return Err(());
        }
        *slot = Some(value.ok_or(())?);
        Ok(())
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => set_once(&mut options.config, args.next())?,
            "--root" => set_once(&mut options.root, args.next())?,
            "--source" => set_once(&mut options.source, args.next())?,
            "--name-field" => set_once(&mut options.name_field, args.next())?,
            "--out" => set_once(&mut options.out, args.next())?,
            "--expand" => options.expand.push(args.next().ok_or(())?),
            "--slow" => {
                if options.slow {
                    return Err(());
                }
                options.slow = true;
            }
            "--print-schema" => {
                if options.print_schema {
                    return Err(());
                }
                options.print_schema = true;
            }
            _ => return Err(()),
        }
    }

    let schema_only = CliOptions { print_schema: true, ..CliOptions::default() };
    if options.print_schema && options != schema_only {
        return Err(());
    }

    Ok(options)
}

fn load_config(options: &CliOptions) -> Result<ViewConfig, Box<dyn Error>> {
    let mut config = match &options.config {
        Some(path) => ViewConfig::load(path)?,
        None => ViewConfig::default(),
    };
    if let Some(root) = &options.root {
        config.root.name = root.clone();
    }
    if let Some(source) = &options.source {
        config.root.source_ref = Some(source.clone());
    }
    if let Some(field) = &options.name_field {
        config.source.name_field = field.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "canopy".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.print_schema {
            println!("{}", serde_json::to_string_pretty(&ViewConfig::json_schema())?);
            return Ok(());
        }

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| -> Box<dyn Error> { err })?;

        let config = load_config(&options)?;
        let speed = if options.slow { TransitionSpeed::Slow } else { TransitionSpeed::Normal };

        let mut surface = SvgSurface::new(config.theme.clone());
        if let Some(out) = &options.out {
            surface = surface.with_output(out);
        }
        let mut source = HttpChildSource::new(config.source.record_fields());
        if let Some(timeout) = config.source.timeout() {
            source = source.with_timeout(timeout);
        }
        let view = TreeView::from_config(&config, surface)?;
        let mut controller = Controller::new(view, source);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(async {
            controller.mount()?;
            for path in &options.expand {
                let Some(node) = controller.view().tree().resolve_path(path) else {
                    warn!(path = %path, "no node at path");
                    continue;
                };
                match controller.on_toggle(node, speed).await? {
                    Settled::Rendered(frame) => {
                        info!(path = %path, ops = frame.ops().len(), "toggled");
                    }
                    Settled::Failed(err) => warn!(path = %path, error = %err, "expansion failed"),
                    other => info!(path = %path, outcome = ?other, "toggle had no visible effect"),
                }
            }
            Ok::<(), Box<dyn Error>>(())
        })?;

        let view = controller.into_view();
        info!(nodes = view.tree().len(), visible = view.scene().nodes().len(), "done");
        if options.out.is_none() {
            print!("{}", view.surface().document());
        }
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("canopy: {err}");
        std::process::exit(1);
    }
}
