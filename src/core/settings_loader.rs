// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::settings::{FieldSpec, RenderSettings};
use crate::integrators::raymarching::{Classification, CompositeOrder};
use crate::math::constants::{Float, Vector3f};
use crate::preprocess::PreprocessSettings;
use crate::transfer::piecewise::{TransferFunction, TransferNode};
use crate::volumes::gradient::GradientMode;
use crate::volumes::{Primitive, ProceduralVolume, Shape};

#[derive(Debug)]
pub enum SettingsLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
}

impl From<std::io::Error> for SettingsLoadError {
    fn from(err: std::io::Error) -> Self {
        SettingsLoadError::Io(err)
    }
}

impl std::fmt::Display for SettingsLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsLoadError::Io(err) => write!(f, "io error: {}", err),
            SettingsLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SettingsLoadError::MissingField(name) => write!(f, "missing field: {}", name),
        }
    }
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RenderSettings, SettingsLoadError> {
    let xml = fs::read_to_string(path.as_ref())?;
    parse_settings(&xml)
}

/// Reads a `<render>` document. Every element and attribute is optional and
/// falls back to `RenderSettings::default()`.
pub fn parse_settings(xml: &str) -> Result<RenderSettings, SettingsLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut settings = RenderSettings::default();

    let mut transfer_preset: Option<TransferFunction> = None;
    let mut transfer_threshold: Option<Float> = None;
    let mut transfer_domain: (Option<Float>, Option<Float>) = (None, None);
    let mut transfer_nodes: Vec<TransferNode> = Vec::new();

    let mut field_type: Option<String> = None;
    let mut field_resolution: usize = 64;
    let mut flow_dim: usize = 64;
    let mut flow_frames: usize = 32;
    let mut preprocess = PreprocessSettings::default();
    let mut primitives: Vec<Primitive> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let attrs = attributes(&e);
                match e.name().as_ref() {
                    b"render" | b"film" => {
                        if let Some(v) = attrs.get("width") {
                            settings.width = parse_usize(v)?;
                        }
                        if let Some(v) = attrs.get("height") {
                            settings.height = parse_usize(v)?;
                        }
                        if let Some(v) = attrs.get("time") {
                            settings.time = parse_float(v)?;
                        }
                    }
                    b"background" => {
                        let color = attrs.get("color").ok_or(SettingsLoadError::MissingField("background.color"))?;
                        settings.background = parse_vec3(color)?;
                    }
                    b"camera" => {
                        let camera = &mut settings.camera;
                        if let Some(v) = attrs.get("target") {
                            camera.target = parse_vec3(v)?;
                        }
                        if let Some(v) = attrs.get("radius") {
                            camera.radius = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("height") {
                            camera.height = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("speed") {
                            camera.angular_speed = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("phase") {
                            camera.phase = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("fov") {
                            camera.fov_y_degrees = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("up") {
                            camera.up = parse_vec3(v)?;
                        }
                    }
                    b"march" => {
                        let march = &mut settings.march;
                        if let Some(v) = attrs.get("samples") {
                            march.max_samples = parse_usize(v)?;
                        }
                        if let Some(v) = attrs.get("order") {
                            march.order = parse_order(v)?;
                        }
                        if let Some(v) = attrs.get("early_exit") {
                            march.early_exit = parse_optional_float(v)?;
                        }
                        if let Some(v) = attrs.get("reference_step") {
                            march.reference_step = parse_optional_float(v)?;
                        }
                        if let Some(v) = attrs.get("classification") {
                            march.classification = parse_classification(v)?;
                        }
                        if let Some(v) = attrs.get("table") {
                            march.preintegration_dim = parse_usize(v)?;
                        }
                        if let Some(v) = attrs.get("lighting") {
                            march.lighting = parse_bool(v)?;
                        }
                        if let Some(v) = attrs.get("gradient") {
                            march.gradient_mode = parse_gradient_mode(v)?;
                        }
                        if let Some(v) = attrs.get("gradient_step") {
                            march.gradient_step = parse_optional_float(v)?;
                        }
                    }
                    b"lighting" => {
                        let phong = &mut settings.phong;
                        if let Some(v) = attrs.get("ambient") {
                            phong.ambient = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("diffuse") {
                            phong.diffuse = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("specular") {
                            phong.specular = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("shininess") {
                            phong.shininess = parse_float(v)?;
                        }
                        if let Some(v) = attrs.get("direction") {
                            phong.light_dir = parse_vec3(v)?
                                .try_normalize(1e-8)
                                .ok_or_else(|| SettingsLoadError::Parse("zero light direction".to_string()))?;
                            phong.headlight = false;
                        }
                        if let Some(v) = attrs.get("headlight") {
                            phong.headlight = parse_bool(v)?;
                        }
                        if let Some(v) = attrs.get("color") {
                            phong.light_color = parse_vec3(v)?;
                        }
                        if let Some(v) = attrs.get("specular_color") {
                            phong.specular_color = parse_vec3(v)?;
                        }
                    }
                    b"transfer" => {
                        if let Some(v) = attrs.get("preset") {
                            transfer_preset = Some(match v.as_str() {
                                "rainbow" => TransferFunction::rainbow(),
                                "ramp" => TransferFunction::ramp(),
                                other => {
                                    return Err(SettingsLoadError::Parse(format!("unknown transfer preset: {}", other)));
                                }
                            });
                        }
                        if let Some(v) = attrs.get("threshold") {
                            transfer_threshold = Some(parse_float(v)?);
                        }
                        if let Some(v) = attrs.get("min") {
                            transfer_domain.0 = Some(parse_float(v)?);
                        }
                        if let Some(v) = attrs.get("max") {
                            transfer_domain.1 = Some(parse_float(v)?);
                        }
                    }
                    b"node" => {
                        let value = attrs.get("value").ok_or(SettingsLoadError::MissingField("node.value"))?;
                        let color = attrs.get("color").ok_or(SettingsLoadError::MissingField("node.color"))?;
                        let alpha = match attrs.get("alpha") {
                            Some(v) => parse_float(v)?,
                            None => 1.0,
                        };
                        transfer_nodes.push(TransferNode::new(parse_float(value)?, parse_vec3(color)?, alpha));
                    }
                    b"field" => {
                        if let Some(v) = attrs.get("type") {
                            field_type = Some(v.clone());
                        }
                        if let Some(v) = attrs.get("resolution") {
                            field_resolution = parse_usize(v)?;
                        }
                        if let Some(v) = attrs.get("dim") {
                            flow_dim = parse_usize(v)?;
                        }
                        if let Some(v) = attrs.get("frames") {
                            flow_frames = parse_usize(v)?;
                        }
                    }
                    b"cuboid" => {
                        let center = attrs.get("center").ok_or(SettingsLoadError::MissingField("cuboid.center"))?;
                        let half = attrs.get("half_extent").ok_or(SettingsLoadError::MissingField("cuboid.half_extent"))?;
                        let shape = Shape::Cuboid { center: parse_vec3(center)?, half_extent: parse_vec3(half)? };
                        primitives.push(Primitive { shape, density: parse_density(&attrs)? });
                    }
                    b"sphere" => {
                        let center = attrs.get("center").ok_or(SettingsLoadError::MissingField("sphere.center"))?;
                        let radius = attrs.get("radius").ok_or(SettingsLoadError::MissingField("sphere.radius"))?;
                        let shape = Shape::Sphere { center: parse_vec3(center)?, radius: parse_float(radius)? };
                        primitives.push(Primitive { shape, density: parse_density(&attrs)? });
                    }
                    b"preprocess" => {
                        if let Some(v) = attrs.get("quantization") {
                            preprocess.quantization_bits = Some(parse_u32(v)?);
                        }
                        if let Some(v) = attrs.get("blur") {
                            preprocess.gaussian_blur = parse_bool(v)?;
                        }
                        if let Some(v) = attrs.get("gradients") {
                            preprocess.gradients = parse_bool(v)?;
                        }
                    }
                    other => {
                        log::warn!("Ignoring unknown settings element <{}>.", String::from_utf8_lossy(other));
                    }
                }
            }
            Err(e) => {
                return Err(SettingsLoadError::Parse(format!("at byte {}: {}", reader.buffer_position(), e)));
            }
            _ => {}
        }

        buf.clear();
    }

    if transfer_preset.is_some() || transfer_threshold.is_some() || !transfer_nodes.is_empty()
        || transfer_domain.0.is_some() || transfer_domain.1.is_some() {
        let base = transfer_preset.unwrap_or_else(|| settings.transfer.clone());
        let nodes = if transfer_nodes.is_empty() { base.nodes().to_vec() } else { transfer_nodes };
        let domain = (transfer_domain.0.unwrap_or(base.domain().0), transfer_domain.1.unwrap_or(base.domain().1));
        settings.transfer = TransferFunction::new(nodes, transfer_threshold.unwrap_or(base.threshold()), domain)
            .map_err(SettingsLoadError::Parse)?;
    }

    let source = if primitives.is_empty() {
        ProceduralVolume::default_scene()
    } else {
        ProceduralVolume::new(primitives)
    };
    settings.field = match field_type.as_deref() {
        None | Some("procedural") => FieldSpec::Procedural(source),
        Some("voxelized") => FieldSpec::Voxelized { source, resolution: field_resolution },
        Some("flow") => FieldSpec::Flow { dim: flow_dim, frames: flow_frames, preprocess },
        Some(other) => return Err(SettingsLoadError::Parse(format!("unknown field type: {}", other))),
    };

    log::debug!("Loaded settings: {}x{} at t = {}.", settings.width, settings.height, settings.time);
    Ok(settings)
}

fn attributes(e: &BytesStart) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        attrs.insert(key, attr.unescape_value().unwrap_or_default().to_string());
    }
    attrs
}

fn parse_float(value: &str) -> Result<Float, SettingsLoadError> {
    value.trim().parse::<Float>().map_err(|_| SettingsLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_optional_float(value: &str) -> Result<Option<Float>, SettingsLoadError> {
    match value.trim() {
        "none" | "off" => Ok(None),
        v => parse_float(v).map(Some),
    }
}

fn parse_u32(value: &str) -> Result<u32, SettingsLoadError> {
    value.trim().parse::<u32>().map_err(|_| SettingsLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, SettingsLoadError> {
    value.trim().parse::<usize>().map_err(|_| SettingsLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_bool(value: &str) -> Result<bool, SettingsLoadError> {
    match value.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(SettingsLoadError::Parse(format!("invalid boolean: {}", value))),
    }
}

fn parse_vec3(value: &str) -> Result<Vector3f, SettingsLoadError> {
    let mut parts = value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty());
    let x = parts.next().ok_or_else(|| SettingsLoadError::Parse("invalid vec3".to_string()))?;
    let y = parts.next().ok_or_else(|| SettingsLoadError::Parse("invalid vec3".to_string()))?;
    let z = parts.next().ok_or_else(|| SettingsLoadError::Parse("invalid vec3".to_string()))?;
    Ok(Vector3f::new(parse_float(x)?, parse_float(y)?, parse_float(z)?))
}

fn parse_density(attrs: &HashMap<String, String>) -> Result<Float, SettingsLoadError> {
    match attrs.get("density") {
        Some(v) => parse_float(v),
        None => Ok(1.0),
    }
}

pub fn parse_order(value: &str) -> Result<CompositeOrder, SettingsLoadError> {
    match value.trim() {
        "front" | "front-to-back" => Ok(CompositeOrder::FrontToBack),
        "back" | "back-to-front" => Ok(CompositeOrder::BackToFront),
        other => Err(SettingsLoadError::Parse(format!("unknown compositing order: {}", other))),
    }
}

fn parse_classification(value: &str) -> Result<Classification, SettingsLoadError> {
    match value.trim() {
        "post" => Ok(Classification::PostClassification),
        "preintegrated" => Ok(Classification::PreIntegrated),
        other => Err(SettingsLoadError::Parse(format!("unknown classification: {}", other))),
    }
}

fn parse_gradient_mode(value: &str) -> Result<GradientMode, SettingsLoadError> {
    match value.trim() {
        "central" => Ok(GradientMode::Central),
        "forward" => Ok(GradientMode::Forward),
        other => Err(SettingsLoadError::Parse(format!("unknown gradient mode: {}", other))),
    }
}
