//! ASCII record representation: one whitespace-separated line per record.

use std::io::{BufRead, Write};

use meshport_core::Mesh;

use crate::error::{MeshIoError, Result};
use crate::ply::binary::face_index;
use crate::ply::codec::{CodecState, VertexLayout};
use crate::ply::header::ElementDecl;

pub struct AsciiReader<R> {
    reader: R,
    state: CodecState,
    records_read: usize,
    line: String,
}

impl<R: BufRead> AsciiReader<R> {
    /// Wraps an input already positioned after `end_header`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: CodecState::AwaitingFirstRecord,
            records_read: 0,
            line: String::new(),
        }
    }

    pub fn state(&self) -> CodecState {
        self.state
    }

    /// Reads the raw tokens of the next record of `element`.
    ///
    /// Returns `Ok(None)` once the input is exhausted. A blank line inside
    /// the record stream is an error.
    pub fn read_record(&mut self, element: &ElementDecl) -> Result<Option<Vec<String>>> {
        if self.state == CodecState::Exhausted {
            return Ok(None);
        }

        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            self.state = CodecState::Exhausted;
            return Ok(None);
        }
        self.state = CodecState::StreamingRecords;

        let tokens: Vec<String> = self.line.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return Err(MeshIoError::UnexpectedEndOfFile {
                element: element.name.clone(),
                record: self.records_read,
            });
        }
        self.records_read += 1;
        Ok(Some(tokens))
    }
}

pub struct AsciiWriter<W> {
    writer: W,
}

impl<W: Write> AsciiWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Appends the vertex, face and edge records of `mesh`.
    pub fn write_records(&mut self, mesh: &Mesh) -> Result<()> {
        let layout = VertexLayout::for_mesh(mesh)?;
        for i in 0..mesh.num_points() {
            let [x, y, z] = mesh.points[i];
            write!(self.writer, "{x} {y} {z}")?;
            if layout.has_normals() {
                let [nx, ny, nz] = mesh.normals[i];
                write!(self.writer, " {nx} {ny} {nz}")?;
            }
            if layout.has_colors() {
                write!(self.writer, " {}", mesh.colors[i])?;
            }
            writeln!(self.writer)?;
        }

        for face in mesh.faces() {
            let [a, b, c] = face.map(face_index);
            writeln!(self.writer, "3 {} {} {}", a?, b?, c?)?;
        }

        for edge in &mesh.edges {
            let c = edge.color;
            writeln!(
                self.writer,
                "{} {} {} {} {}",
                edge.start, edge.end, c.red, c.green, c.blue
            )?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
