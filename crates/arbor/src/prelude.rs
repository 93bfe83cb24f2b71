//! Convenience re-exports for building arbor applications.

pub use crate::{
    Buffer, CancelHandle, Command, Deliver, Exit, Node, Outcome, Program, Runtime, RuntimeConfig,
    Update, View, ViewKey,
    buffer::{Mask, Viewport},
    error::{self, Result},
    event::{
        Event,
        key::{self, Key, KeyCode},
        mouse::{self, Button, MouseEvent},
    },
    geom::{Expanse, Point, Rect},
    layout::{Align, Axis, DesiredSize, Dimension, Edges},
    style::{Attr, AttrSet, Color, Style},
    view::{
        Boxed, Flow, Grid, Scroll, Spinner, Stack, Text, Window, boxed, column, fill, flow, grid,
        row, scroll, space, spinner, text, window, zstack,
    },
};
