//! Known response shapes and their typed projections.
//!
//! Every shape the crate understands has a [`ShapeTag`], a renderer key it is
//! recognised by in raw responses, and a typed struct. [`Shape`] is the sum of
//! all typed structs; classification attaches tags at parse time and lookups
//! are plain matches over them.

mod catalog;
mod renderers;

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FeedResult;
use crate::node::Node;

pub use catalog::{ShapeBuilder, ShapeCatalog, ShapeRule};
pub use renderers::*;

/// A shape with a typed projection.
pub trait ShapeKind: Sized {
    const TAG: ShapeTag;

    /// Build from the payload under the renderer key.
    fn from_payload(payload: &Node) -> FeedResult<Self>;

    fn from_shape(shape: Shape) -> Option<Self>;

    fn from_shape_ref(shape: &Shape) -> Option<&Self>;
}

macro_rules! shapes {
    ($($name:ident => $renderer:literal),+ $(,)?) => {
        /// Identifier of a recognised response shape.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum ShapeTag {
            $($name),+
        }

        impl ShapeTag {
            pub const ALL: &'static [ShapeTag] = &[$(ShapeTag::$name),+];

            pub fn name(self) -> &'static str {
                match self {
                    $(ShapeTag::$name => stringify!($name)),+
                }
            }

            /// The raw key the service wraps this shape's payload in.
            pub fn renderer(self) -> &'static str {
                match self {
                    $(ShapeTag::$name => $renderer),+
                }
            }

            pub fn builder(self) -> ShapeBuilder {
                match self {
                    $(ShapeTag::$name => build_shape::<$name>),+
                }
            }
        }

        /// A typed instance of one recognised shape.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum Shape {
            $($name($name)),+
        }

        impl Shape {
            pub fn tag(&self) -> ShapeTag {
                match self {
                    $(Shape::$name(_) => ShapeTag::$name),+
                }
            }
        }

        $(
            impl ShapeKind for $name {
                const TAG: ShapeTag = ShapeTag::$name;

                fn from_payload(payload: &Node) -> FeedResult<Self> {
                    $name::build(payload)
                }

                fn from_shape(shape: Shape) -> Option<Self> {
                    match shape {
                        Shape::$name(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_shape_ref(shape: &Shape) -> Option<&Self> {
                    match shape {
                        Shape::$name(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$name> for Shape {
                fn from(inner: $name) -> Self {
                    Shape::$name(inner)
                }
            }
        )+
    };
}

shapes! {
    C4TabbedHeader => "c4TabbedHeaderRenderer",
    CarouselHeader => "carouselHeaderRenderer",
    InteractiveTabbedHeader => "interactiveTabbedHeaderRenderer",
    ChannelMetadata => "channelMetadataRenderer",
    MicroformatData => "microformatDataRenderer",
    SubscribeButton => "subscribeButtonRenderer",
    ChannelAboutFullMetadata => "channelAboutFullMetadataRenderer",
    TwoColumnBrowseResults => "twoColumnBrowseResultsRenderer",
    Tab => "tabRenderer",
    ExpandableTab => "expandableTabRenderer",
    SectionList => "sectionListRenderer",
    ItemSection => "itemSectionRenderer",
    ItemSectionHeader => "itemSectionHeaderRenderer",
    FeedFilterChipBar => "feedFilterChipBarRenderer",
    ChipCloudChip => "chipCloudChipRenderer",
    AppendContinuationItemsAction => "appendContinuationItemsAction",
    ReloadContinuationItemsCommand => "reloadContinuationItemsCommand",
    ContinuationItem => "continuationItemRenderer",
    PageIntroduction => "pageIntroductionRenderer",
    SettingsOptions => "settingsOptionsRenderer",
    SettingsSwitch => "settingsSwitchRenderer",
    SettingsSidebar => "settingsSidebarRenderer",
    CompactLink => "compactLinkRenderer",
}

fn build_shape<T: ShapeKind + Into<Shape>>(payload: &Node) -> FeedResult<Shape> {
    T::from_payload(payload).map(Into::into)
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Shape {
    /// Visible fields of the typed projection, snake_case keyed.
    pub fn fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Whether every constraint equals the corresponding visible field.
    pub fn matches(&self, constraints: &[(&str, Value)]) -> bool {
        let fields = self.fields();
        constraints
            .iter()
            .all(|(k, v)| fields.get(*k).is_some_and(|found| found == v))
    }

    pub fn is<T: ShapeKind>(&self) -> bool {
        self.tag() == T::TAG
    }

    pub fn downcast<T: ShapeKind>(&self) -> Option<&T> {
        T::from_shape_ref(self)
    }
}

/// An ordered sequence of typed instances.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeList {
    shapes: Vec<Shape>,
}

impl ShapeList {
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    pub fn first(&self) -> Option<&Shape> {
        self.shapes.first()
    }

    /// First instance whose visible fields match every constraint.
    pub fn get(&self, constraints: &[(&str, Value)]) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.matches(constraints))
    }

    /// Typed view over the instances of `T`.
    pub fn of_type<T: ShapeKind>(&self) -> Vec<&T> {
        self.shapes.iter().filter_map(T::from_shape_ref).collect()
    }

    pub fn into_vec(self) -> Vec<Shape> {
        self.shapes
    }
}

impl FromIterator<Shape> for ShapeList {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ShapeList {
    type Item = Shape;
    type IntoIter = std::vec::IntoIter<Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ShapeList {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_tag_has_a_distinct_renderer() {
        let mut renderers: Vec<&str> = ShapeTag::ALL.iter().map(|t| t.renderer()).collect();
        renderers.sort_unstable();
        renderers.dedup();
        assert_eq!(renderers.len(), ShapeTag::ALL.len());
    }

    #[test]
    fn test_fields_are_snake_case_projection() {
        let node = Node::new(json!({
            "chipCloudChipRenderer": { "text": { "simpleText": "Videos" }, "isSelected": true }
        }));
        let shape = node.as_one_of(&[ShapeTag::ChipCloudChip]).unwrap();
        let fields = shape.fields();
        assert_eq!(fields.get("text"), Some(&json!("Videos")));
        assert_eq!(fields.get("is_selected"), Some(&json!(true)));
        assert!(shape.matches(&[("is_selected", json!(true))]));
        assert!(!shape.matches(&[("is_selected", json!(false))]));
        assert!(shape.is::<ChipCloudChip>());
        assert!(shape.downcast::<Tab>().is_none());
    }
}
