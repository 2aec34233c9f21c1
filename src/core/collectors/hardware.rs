//! Processor, memory, storage and display.

use std::sync::Arc;

use super::{capacity_reading, external_storage, CategoryCollector, ProbeList};
use crate::core::availability::Requirement;
use crate::core::item::{ChartIcon, Category, Reading};
use crate::error::DevinfoError;
use crate::platform::Platform;

pub fn collector(platform: &Arc<dyn Platform>) -> CategoryCollector {
    let mut probes = ProbeList::new(platform);
    probes
        .add("CPU Architecture", Requirement::NONE, |p| {
            Ok(Reading::text(p.cpu()?.architecture))
        })
        .add("CPU Cores", Requirement::NONE, |p| {
            Ok(Reading::text(p.cpu()?.cores.to_string()))
        })
        .add("Supported ABIs", Requirement::NONE, |p| {
            Ok(Reading::text(p.cpu()?.abis.join(", ")))
        })
        .add("RAM", Requirement::NONE, |p| {
            Ok(capacity_reading(p.memory()?, ChartIcon::Memory))
        })
        .add("Swap", Requirement::NONE, |p| {
            let swap = p.swap()?;
            if swap.total_bytes == 0 {
                return Ok(Reading::empty());
            }
            Ok(capacity_reading(swap, ChartIcon::Memory))
        })
        .add("Internal Storage", Requirement::NONE, |p| {
            Ok(capacity_reading(p.internal_storage()?, ChartIcon::Storage))
        })
        .add("External Storage", Requirement::NONE, |p| {
            let external = external_storage(p.internal_storage()?, p.all_storage()?);
            if external.total_bytes == 0 {
                return Err(DevinfoError::probe("no external volume mounted"));
            }
            Ok(capacity_reading(external, ChartIcon::Storage))
        })
        .add("Screen Resolution", Requirement::NONE, |p| {
            let display = p.display()?;
            Ok(Reading::text(format!("{} x {}", display.width_px, display.height_px)))
        })
        .add("Screen Density", Requirement::NONE, |p| {
            Ok(Reading::text(format!("{} dpi", p.display()?.density_dpi)))
        });

    probes.into_collector(Category::Hardware)
}
