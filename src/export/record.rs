use std::io::{self, Write};

use glam::Vec3;

use crate::mesh::Vertex;

/// One output line: three world-space vertices sharing a flat color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleRecord {
    pub vertices: [Vertex; 3],
    pub color: Vec3,
}

impl TriangleRecord {
    /// Writes `px,py,pz nx,ny,nz r,g,b ` for each vertex, then a newline.
    pub fn write_line<W: Write>(&self, writer: &mut W, precision: usize) -> io::Result<()> {
        for vertex in &self.vertices {
            write_triple(writer, vertex.position, precision)?;
            write_triple(writer, vertex.normal, precision)?;
            write_triple(writer, self.color, precision)?;
        }

        writeln!(writer)
    }
}

fn write_triple<W: Write>(writer: &mut W, value: Vec3, precision: usize) -> io::Result<()> {
    write_float(writer, value.x, precision)?;
    write!(writer, ",")?;
    write_float(writer, value.y, precision)?;
    write!(writer, ",")?;
    write_float(writer, value.z, precision)?;
    write!(writer, " ")
}

/// Fixed-point; non-finite values as `nan`, `inf` and `-inf`.
fn write_float<W: Write>(writer: &mut W, value: f32, precision: usize) -> io::Result<()> {
    if value.is_nan() {
        write!(writer, "nan")
    } else {
        write!(writer, "{:.*}", precision, value)
    }
}
