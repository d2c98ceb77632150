use std::io::Cursor;

use meshport_core::{Color, Edge, Mesh};
use meshport_io::ply::codec::ElementReader;
use meshport_io::ply::{decode_header, decode_ply, reader::build_mesh, PlyFormat, PlyWriter};
use meshport_io::{MeshIoError, PlyReader, Reader, Writer};
use proptest::prelude::*;
use tempfile::tempdir;

fn encode(mesh: &Mesh, format: PlyFormat) -> Vec<u8> {
    let mut writer = PlyWriter::new().with_format(format);
    writer.add_mesh(mesh, None).unwrap();
    let mut out = Vec::new();
    writer.write_to(&mut out).unwrap();
    out
}

fn decode(bytes: &[u8]) -> Mesh {
    let ply = decode_ply(&mut Cursor::new(bytes), "mem.ply").unwrap();
    build_mesh(&ply).unwrap()
}

fn assert_close(a: &[[f32; 3]], b: &[[f32; 3]]) {
    assert_eq!(a.len(), b.len());
    for (i, (p, q)) in a.iter().zip(b).enumerate() {
        let diff = (p[0] - q[0]).abs() + (p[1] - q[1]).abs() + (p[2] - q[2]).abs();
        assert!(diff < 1e-5, "mismatch at index {i}: {p:?} vs {q:?}");
    }
}

fn sample_mesh(normals: bool, colors: bool) -> Mesh {
    let mut mesh = Mesh::from_points(vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.125, -3.5, 1e-3],
    ]);
    if normals {
        mesh.normals = vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.6, 0.8, 0.0]];
    }
    if colors {
        mesh.colors = vec![
            Color::new(255, 0, 0, 255),
            Color::new(0, 255, 0, 128),
            Color::new(0, 0, 255, 0),
            Color::GRAY,
        ];
    }
    mesh
}

#[test]
fn round_trip_all_layouts_and_representations() {
    for format in [PlyFormat::Ascii, PlyFormat::BinaryLittleEndian] {
        for (normals, colors) in [(false, false), (true, false), (true, true), (false, true)] {
            let mesh = sample_mesh(normals, colors);
            let decoded = decode(&encode(&mesh, format));

            assert_close(&decoded.points, &mesh.points);
            assert_close(&decoded.normals, &mesh.normals);
            assert_eq!(decoded.colors, mesh.colors, "{format} normals={normals} colors={colors}");
        }
    }
}

#[test]
fn representations_decode_to_equal_records() {
    let mut mesh = sample_mesh(true, true);
    mesh.add_face([0, 1, 2]);
    mesh.edges.push(Edge::new(1, 3, Color::new(7, 8, 9, 255)));

    let ascii = decode_ply(&mut Cursor::new(encode(&mesh, PlyFormat::Ascii)), "a.ply").unwrap();
    let binary = decode_ply(
        &mut Cursor::new(encode(&mesh, PlyFormat::BinaryLittleEndian)),
        "b.ply",
    )
    .unwrap();

    assert_eq!(ascii.elements.len(), binary.elements.len());
    for (a, b) in ascii.elements.iter().zip(&binary.elements) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.records, b.records, "element {}", a.name);
    }
}

#[test]
fn edges_round_trip_with_opaque_alpha() {
    let mut mesh = sample_mesh(false, false);
    mesh.edges = vec![
        Edge::new(0, 1, Color::new(10, 20, 30, 255)),
        Edge::new(2, 3, Color::new(40, 50, 60, 255)),
    ];
    for format in [PlyFormat::Ascii, PlyFormat::BinaryLittleEndian] {
        assert_eq!(decode(&encode(&mesh, format)).edges, mesh.edges);
    }
}

#[test]
fn short_binary_vertex_data_is_truncated() {
    let mesh = sample_mesh(true, false);
    let mut bytes = encode(&mesh, PlyFormat::BinaryLittleEndian);
    bytes.truncate(bytes.len() - 5);

    let err = decode_ply(&mut Cursor::new(bytes), "short.ply").unwrap_err();
    assert!(matches!(err, MeshIoError::TruncatedRecord { ref element, .. } if element == "vertex"));
}

#[test]
fn missing_trailing_records_are_truncated() {
    let mesh = sample_mesh(false, false);
    let mut bytes = encode(&mesh, PlyFormat::BinaryLittleEndian);
    bytes.truncate(bytes.len() - 12);

    let err = decode_ply(&mut Cursor::new(bytes), "short.ply").unwrap_err();
    assert!(matches!(err, MeshIoError::TruncatedRecord { .. }));
}

#[test]
fn big_endian_is_rejected_before_records() {
    let text = b"ply\nformat binary_big_endian 1.0\nelement vertex 1\nproperty float x\nend_header\n";
    let mut cursor = Cursor::new(text.to_vec());
    let ply = decode_header(&mut cursor, "be.ply").unwrap();
    assert_eq!(ply.format, PlyFormat::BinaryBigEndian);
    assert!(matches!(
        ElementReader::for_format(ply.format, &mut cursor),
        Err(MeshIoError::UnsupportedRepresentation(_))
    ));
}

#[test]
fn file_round_trip_through_reader() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quad.ply");

    let mut mesh = sample_mesh(true, true);
    mesh.add_face([0, 1, 2]);
    mesh.add_face([1, 3, 2]);

    let mut writer = PlyWriter::new();
    writer.add_mesh(&mesh, Some("quad")).unwrap();
    writer.write(&path).unwrap();

    let decoded = PlyReader::open(&path).unwrap().read_mesh().unwrap();
    assert_eq!(decoded.name, "quad");
    assert_eq!(decoded.faces(), mesh.faces());
    assert_eq!(decoded.colors, mesh.colors);
}

proptest! {
    #[test]
    fn prop_binary_round_trip_is_exact(
        points in prop::collection::vec(prop::array::uniform3(-1e6f32..1e6f32), 1..64),
        seed in any::<u8>(),
    ) {
        let mut mesh = Mesh::from_points(points.clone());
        mesh.colors = (0..points.len())
            .map(|i| Color::new(seed, (i % 256) as u8, 1, 255))
            .collect();

        let decoded = decode(&encode(&mesh, PlyFormat::BinaryLittleEndian));
        prop_assert_eq!(decoded.points, points);
        prop_assert_eq!(decoded.colors, mesh.colors);
    }

    #[test]
    fn prop_ascii_round_trip_is_exact(
        points in prop::collection::vec(prop::array::uniform3(-1e6f32..1e6f32), 1..64),
    ) {
        let mesh = Mesh::from_points(points.clone());
        let decoded = decode(&encode(&mesh, PlyFormat::Ascii));
        prop_assert_eq!(decoded.points, points);
    }
}
