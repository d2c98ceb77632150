//! PLY decode benchmarks.

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meshport_core::{Color, Mesh};
use meshport_io::ply::{decode_ply, reader::build_mesh, PlyFormat, PlyWriter};
use meshport_io::Writer;

fn grid_mesh(side: u32) -> Mesh {
    let mut mesh = Mesh::new();
    for y in 0..side {
        for x in 0..side {
            mesh.points.push([x as f32, y as f32, 0.0]);
            mesh.normals.push([0.0, 0.0, 1.0]);
            mesh.colors.push(Color::rgb((x % 256) as u8, (y % 256) as u8, 128));
        }
    }
    for y in 0..side - 1 {
        for x in 0..side - 1 {
            let i = y * side + x;
            mesh.add_face([i, i + 1, i + side]);
            mesh.add_face([i + 1, i + side + 1, i + side]);
        }
    }
    mesh
}

fn encode(mesh: &Mesh, format: PlyFormat) -> Vec<u8> {
    let mut writer = PlyWriter::new().with_format(format);
    writer.add_mesh(mesh, None).expect("add mesh");
    let mut out = Vec::new();
    writer.write_to(&mut out).expect("encode");
    out
}

fn decode_binary(c: &mut Criterion) {
    let bytes = encode(&grid_mesh(100), PlyFormat::BinaryLittleEndian);
    c.bench_function("decode_binary_10k", |b| {
        b.iter(|| {
            let ply = decode_ply(&mut Cursor::new(black_box(&bytes)), "bench.ply").unwrap();
            build_mesh(&ply).unwrap()
        })
    });
}

fn decode_ascii(c: &mut Criterion) {
    let bytes = encode(&grid_mesh(100), PlyFormat::Ascii);
    c.bench_function("decode_ascii_10k", |b| {
        b.iter(|| {
            let ply = decode_ply(&mut Cursor::new(black_box(&bytes)), "bench.ply").unwrap();
            build_mesh(&ply).unwrap()
        })
    });
}

criterion_group!(benches, decode_binary, decode_ascii);
criterion_main!(benches);
