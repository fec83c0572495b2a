use std::io::{self, Write};

/// Receives the dependency stream in driver order, using original ids.
/// `begin` and `end` bracket every variable the driver searches from.
pub trait DependencySink {
    fn begin(&mut self, _var: u32) -> io::Result<()> {
        Ok(())
    }

    fn dependency(&mut self, var: u32, dep: u32) -> io::Result<()>;

    fn end(&mut self, _var: u32) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// `v x` per line.
    List,
    /// `v: x1 x2 ... 0` per variable, as DepQBF reads it.
    Adjacency,
    /// Nothing per edge, only the total.
    Count,
}

/// Prints one `v x` line per dependency.
pub struct ListWriter<W: Write> {
    out: W,
}

impl<W: Write> ListWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> DependencySink for ListWriter<W> {
    fn dependency(&mut self, var: u32, dep: u32) -> io::Result<()> {
        writeln!(self.out, "{} {}", var, dep)
    }
}

pub struct AdjacencyWriter<W: Write> {
    out: W,
}

impl<W: Write> AdjacencyWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> DependencySink for AdjacencyWriter<W> {
    fn begin(&mut self, var: u32) -> io::Result<()> {
        write!(self.out, "{}:", var)
    }

    fn dependency(&mut self, _var: u32, dep: u32) -> io::Result<()> {
        write!(self.out, " {}", dep)
    }

    fn end(&mut self, _var: u32) -> io::Result<()> {
        writeln!(self.out, " 0")
    }
}

/// Discards edges; the driver's total is all that is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountOnly;

impl DependencySink for CountOnly {
    fn dependency(&mut self, _var: u32, _dep: u32) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every edge in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeCollector {
    pub edges: Vec<(u32, u32)>,
}

impl DependencySink for EdgeCollector {
    fn dependency(&mut self, var: u32, dep: u32) -> io::Result<()> {
        self.edges.push((var, dep));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AdjacencyWriter, DependencySink, ListWriter};

    #[test]
    fn adjacency_lines_end_with_zero() {
        let mut buf = Vec::new();
        {
            let mut w = AdjacencyWriter::new(&mut buf);
            w.begin(3).expect("write");
            w.dependency(3, 7).expect("write");
            w.dependency(3, 9).expect("write");
            w.end(3).expect("write");
            w.begin(4).expect("write");
            w.end(4).expect("write");
        }
        assert_eq!(String::from_utf8_lossy(&buf), "3: 7 9 0\n4: 0\n");
    }

    #[test]
    fn list_lines() {
        let mut buf = Vec::new();
        {
            let mut w = ListWriter::new(&mut buf);
            w.begin(1).expect("write");
            w.dependency(1, 2).expect("write");
            w.end(1).expect("write");
        }
        assert_eq!(String::from_utf8_lossy(&buf), "1 2\n");
    }
}
