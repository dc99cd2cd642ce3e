use crate::ir::PersonGraph;
use crate::layout::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub screen_width: i32,
    pub screen_height: i32,
    pub boxes: Vec<BoxDump>,
    pub connectors: Vec<ConnectorDump>,
    pub spouse_links: Vec<SpouseLinkDump>,
    pub stubs: Vec<StubDump>,
}

#[derive(Debug, Serialize)]
pub struct BoxDump {
    pub xref: String,
    pub name: String,
    pub life_dates: Option<String>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub points: Vec<[i32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct SpouseLinkDump {
    pub x: i32,
    pub top_y: i32,
    pub bottom_y: i32,
}

#[derive(Debug, Serialize)]
pub struct StubDump {
    pub from: [i32; 2],
    pub to_x: i32,
}

impl SceneDump {
    pub fn from_scene(scene: &Scene, graph: &PersonGraph) -> Self {
        let boxes = scene
            .boxes
            .iter()
            .map(|b| BoxDump {
                xref: graph
                    .record(b.person)
                    .map(|record| record.xref.clone())
                    .unwrap_or_default(),
                name: b.name.clone(),
                life_dates: b.life_dates.clone(),
                x: b.rect.x,
                y: b.rect.y,
                width: b.rect.width,
                height: b.rect.height,
                selected: b.selected,
            })
            .collect();

        let connectors = scene
            .connectors
            .iter()
            .map(|c| ConnectorDump {
                points: c.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        let spouse_links = scene
            .spouse_links
            .iter()
            .map(|link| SpouseLinkDump {
                x: link.x,
                top_y: link.top_y,
                bottom_y: link.bottom_y,
            })
            .collect();

        let stubs = scene
            .stubs
            .iter()
            .map(|stub| StubDump {
                from: [stub.from.0, stub.from.1],
                to_x: stub.to_x,
            })
            .collect();

        SceneDump {
            screen_width: scene.screen_width,
            screen_height: scene.screen_height,
            boxes,
            connectors,
            spouse_links,
            stubs,
        }
    }
}

pub fn write_scene_dump(path: &Path, scene: &Scene, graph: &PersonGraph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = SceneDump::from_scene(scene, graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
