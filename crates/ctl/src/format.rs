use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, Table};
use qbox::{
    image::ImageSpec,
    mac::{format_mac, generate_mac},
    machine::QemuBox,
};
use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BoxSummary {
    pub name: String,
    pub architecture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    pub mac: String,
}

pub fn box_summary(machine: &QemuBox) -> BoxSummary {
    BoxSummary {
        name: machine.name.clone(),
        architecture: machine.architecture().to_string(),
        image: machine.image.clone(),
        invalid_image: machine.invalid_image.clone(),
        args: machine.definition.args(),
        mac: format_mac(&generate_mac(&machine.name)),
    }
}

pub fn image_text(image: Option<&ImageSpec>) -> String {
    match image {
        Some(image) => format!("{} ({}, {})", image.file, image.format, image.size),
        None => "none".to_string(),
    }
}

pub fn box_table(boxes: &[QemuBox]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table.set_header(vec!["name", "architecture", "image", "mac"]);
    for machine in boxes {
        let (image, image_color) = match (&machine.image, &machine.invalid_image) {
            (_, Some(reason)) => (format!("invalid: {}", reason), Color::Red),
            (Some(image), None) => (image_text(Some(image)), Color::Reset),
            (None, None) => (image_text(None), Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&machine.name),
            Cell::new(machine.architecture()),
            Cell::new(image).fg(image_color),
            Cell::new(format_mac(&generate_mac(&machine.name))),
        ]);
    }
    table
}
