use std::fs;

use meshport_io::{MeshIoError, PlyFormat};
use meshport_tools::{convert, inspect, CliError};
use tempfile::tempdir;

const ASCII_TRIANGLE: &str = "ply\n\
format ascii 1.0\n\
comment made by hand\n\
element vertex 3\n\
property float x\n\
property float y\n\
property float z\n\
property uchar red\n\
property uchar green\n\
property uchar blue\n\
element face 1\n\
property list uchar int vertex_indices\n\
end_header\n\
0 0 0 255 0 0\n\
1 0 0 0 255 0\n\
0 1 0 0 0 255\n\
3 0 1 2\n";

#[test]
fn inspect_reports_header_and_mesh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tri.ply");
    fs::write(&path, ASCII_TRIANGLE).unwrap();

    let summary = inspect(&path).unwrap();
    assert_eq!(summary.format, "ply");
    let ply = summary.ply.as_ref().unwrap();
    assert_eq!(ply.representation, "ascii");
    assert_eq!(ply.comments, vec!["made by hand".to_string()]);
    assert_eq!(ply.elements.len(), 2);
    assert_eq!(ply.elements[0].name, "vertex");
    assert_eq!(ply.elements[0].count, 3);
    assert_eq!(ply.elements[0].properties.len(), 6);

    assert_eq!(summary.meshes.len(), 1);
    assert_eq!(summary.meshes[0].points, 3);
    assert_eq!(summary.meshes[0].faces, 1);
    assert_eq!(summary.meshes[0].colors, 3);

    let text = summary.to_string();
    assert!(text.contains("element vertex (3 records)"));
    assert!(text.contains("1 faces"));
}

#[test]
fn inspect_json_is_valid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tri.ply");
    fs::write(&path, ASCII_TRIANGLE).unwrap();

    let json = inspect(&path).unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["format"], "ply");
    assert_eq!(value["meshes"][0]["points"], 3);
    assert_eq!(value["ply"]["elements"][1]["name"], "face");
}

#[test]
fn obj_summary_has_no_ply_section() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tri.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

    let summary = inspect(&path).unwrap();
    assert!(summary.ply.is_none());
    assert_eq!(summary.meshes[0].faces, 1);

    let json = summary.to_json().unwrap();
    assert!(!json.contains("\"ply\""));
}

#[test]
fn convert_switches_representation() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tri.ply");
    fs::write(&input, ASCII_TRIANGLE).unwrap();

    let written = convert(
        &input,
        dir.path().join("tri_bin.ply"),
        Some(PlyFormat::BinaryLittleEndian),
        false,
    )
    .unwrap();
    let bytes = fs::read(&written).unwrap();
    assert!(bytes.starts_with(b"ply\nformat binary_little_endian 1.0\n"));

    let summary = inspect(&written).unwrap();
    assert_eq!(summary.meshes[0].points, 3);
    assert_eq!(summary.meshes[0].colors, 3);
}

#[test]
fn convert_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tri.ply");
    fs::write(&input, ASCII_TRIANGLE).unwrap();
    let output = dir.path().join("tri.obj");
    fs::write(&output, "").unwrap();

    let err = convert(&input, &output, None, false).unwrap_err();
    assert!(matches!(err, CliError::Io(MeshIoError::AlreadyExists(_))));

    let written = convert(&input, &output, None, true).unwrap();
    assert!(fs::read_to_string(written).unwrap().contains("f 1 2 3"));
}
