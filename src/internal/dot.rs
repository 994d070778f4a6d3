//! Conversion of a lazy DFA into the graphviz dot format.
//! Only the materialised vertices and the resolved edges appear in the rendering.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use super::dfa::{Dfa, ROOT};
use super::ids::VertexID;
use super::translate::{BASES, NBASES};

/// Render the materialised part of a lazy DFA to the graphviz dot format.
pub(crate) fn dfa_render<W: Write>(dfa: &Dfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for (id, vertex) in dfa.vertices().iter().enumerate() {
        let descriptor = vertex.descriptor();
        let mut node = digraph.node_auto();
        node.set_label(&format!(
            "{}\nd={} m={}",
            id, descriptor.distance, descriptor.min_to_match
        ));
        if VertexID::new(id as u32) == ROOT {
            node.set_shape(dot_writer::Shape::Circle)
                .set_color(dot_writer::Color::Blue)
                .set_pen_width(3.0);
        }
    }
    for (id, vertex) in dfa.vertices().iter().enumerate() {
        for base in 0..NBASES {
            if let Some(target) = vertex.edge(base) {
                digraph
                    .edge(
                        &format!("node_{id}"),
                        &format!("node_{}", target.as_usize()),
                    )
                    .attributes()
                    .set_label(&BASES[base].to_string());
            }
        }
    }
}
