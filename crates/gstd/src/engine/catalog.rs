//! Built-in element factories understood by the simulated engine.

use crate::object::{PropertyDescriptor, PropertyFlags, PropertyKind};

/// Which sides of an element can be linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadLayout {
    /// Produces data; nothing links into it.
    Source,
    /// Consumes and produces data.
    Filter,
    /// Consumes data; nothing links out of it.
    Sink,
}

impl PadLayout {
    /// True when the element can feed a downstream element.
    #[must_use]
    pub const fn has_src(self) -> bool {
        matches!(self, Self::Source | Self::Filter)
    }

    /// True when the element can accept an upstream element.
    #[must_use]
    pub const fn has_sink(self) -> bool {
        matches!(self, Self::Filter | Self::Sink)
    }
}

/// An element factory: its name, linkable pads and property table.
#[derive(Debug, PartialEq)]
pub struct FactorySpec {
    /// Factory name used in launch descriptions.
    pub name: &'static str,
    /// Linkable sides.
    pub pads: PadLayout,
    /// Factory-specific properties.
    pub properties: &'static [PropertyDescriptor],
}

const RW: PropertyFlags = PropertyFlags::READ_WRITE;
const RO: PropertyFlags = PropertyFlags::READ_ONLY;
const COUNT: PropertyKind = PropertyKind::Integer {
    min: -1,
    max: i32::MAX as i64,
};
const UNSIGNED: PropertyKind = PropertyKind::Integer {
    min: 0,
    max: u32::MAX as i64,
};
const UNIT: PropertyKind = PropertyKind::Double { min: 0.0, max: 1.0 };

const NUM_BUFFERS: PropertyDescriptor =
    PropertyDescriptor::new("num-buffers", COUNT, RW, "-1");
const IS_LIVE: PropertyDescriptor =
    PropertyDescriptor::new("is-live", PropertyKind::Boolean, RW, "false");
const SYNC_ON: PropertyDescriptor =
    PropertyDescriptor::new("sync", PropertyKind::Boolean, RW, "true");
const SYNC_OFF: PropertyDescriptor =
    PropertyDescriptor::new("sync", PropertyKind::Boolean, RW, "false");
const SILENT: PropertyDescriptor =
    PropertyDescriptor::new("silent", PropertyKind::Boolean, RW, "true");
const LOCATION: PropertyDescriptor =
    PropertyDescriptor::new("location", PropertyKind::String, RW, "");
const QOS: PropertyDescriptor = PropertyDescriptor::new("qos", PropertyKind::Boolean, RW, "true");

const FACTORIES: &[FactorySpec] = &[
    FactorySpec {
        name: "videotestsrc",
        pads: PadLayout::Source,
        properties: &[
            PropertyDescriptor::new(
                "pattern",
                PropertyKind::Enumeration(&[
                    "smpte", "snow", "black", "white", "red", "green", "blue", "ball",
                ]),
                RW,
                "smpte",
            ),
            IS_LIVE,
            NUM_BUFFERS,
        ],
    },
    FactorySpec {
        name: "audiotestsrc",
        pads: PadLayout::Source,
        properties: &[
            PropertyDescriptor::new(
                "wave",
                PropertyKind::Enumeration(&[
                    "sine",
                    "square",
                    "saw",
                    "triangle",
                    "silence",
                    "white-noise",
                ]),
                RW,
                "sine",
            ),
            PropertyDescriptor::new(
                "freq",
                PropertyKind::Double {
                    min: 0.0,
                    max: 20_000.0,
                },
                RW,
                "440",
            ),
            PropertyDescriptor::new("volume", UNIT, RW, "0.8"),
            IS_LIVE,
            NUM_BUFFERS,
        ],
    },
    FactorySpec {
        name: "fakesrc",
        pads: PadLayout::Source,
        properties: &[IS_LIVE, NUM_BUFFERS, SILENT],
    },
    FactorySpec {
        name: "filesrc",
        pads: PadLayout::Source,
        properties: &[LOCATION],
    },
    FactorySpec {
        name: "identity",
        pads: PadLayout::Filter,
        properties: &[
            SILENT,
            PropertyDescriptor::new(
                "sleep-time",
                PropertyKind::Integer {
                    min: 0,
                    max: u32::MAX as i64,
                },
                RW,
                "0",
            ),
            PropertyDescriptor::new("drop-probability", UNIT, RW, "0"),
        ],
    },
    FactorySpec {
        name: "queue",
        pads: PadLayout::Filter,
        properties: &[
            PropertyDescriptor::new("max-size-buffers", UNSIGNED, RW, "200"),
            PropertyDescriptor::new("max-size-bytes", UNSIGNED, RW, "10485760"),
            PropertyDescriptor::new(
                "leaky",
                PropertyKind::Enumeration(&["no", "upstream", "downstream"]),
                RW,
                "no",
            ),
            PropertyDescriptor::new("current-level-buffers", UNSIGNED, RO, "0"),
        ],
    },
    FactorySpec {
        name: "tee",
        pads: PadLayout::Filter,
        properties: &[
            PropertyDescriptor::new("num-src-pads", UNSIGNED, RO, "0"),
            PropertyDescriptor::new("allow-not-linked", PropertyKind::Boolean, RW, "false"),
        ],
    },
    FactorySpec {
        name: "capsfilter",
        pads: PadLayout::Filter,
        properties: &[PropertyDescriptor::new(
            "caps",
            PropertyKind::String,
            RW,
            "ANY",
        )],
    },
    FactorySpec {
        name: "videoconvert",
        pads: PadLayout::Filter,
        properties: &[QOS],
    },
    FactorySpec {
        name: "audioconvert",
        pads: PadLayout::Filter,
        properties: &[
            PropertyDescriptor::new(
                "dithering",
                PropertyKind::Enumeration(&["none", "rpdf", "tpdf", "tpdf-hf"]),
                RW,
                "tpdf",
            ),
            QOS,
        ],
    },
    FactorySpec {
        name: "fakesink",
        pads: PadLayout::Sink,
        properties: &[SYNC_OFF, SILENT, NUM_BUFFERS],
    },
    FactorySpec {
        name: "filesink",
        pads: PadLayout::Sink,
        properties: &[LOCATION, SYNC_OFF],
    },
    FactorySpec {
        name: "autovideosink",
        pads: PadLayout::Sink,
        properties: &[SYNC_ON],
    },
    FactorySpec {
        name: "autoaudiosink",
        pads: PadLayout::Sink,
        properties: &[SYNC_ON],
    },
];

/// Every known factory.
#[must_use]
pub fn factories() -> &'static [FactorySpec] {
    FACTORIES
}

/// Looks up a factory by name.
#[must_use]
pub fn find_factory(name: &str) -> Option<&'static FactorySpec> {
    FACTORIES.iter().find(|factory| factory.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn factory_names_are_unique() {
        let mut seen = HashSet::new();
        for factory in factories() {
            assert!(seen.insert(factory.name), "duplicate {}", factory.name);
        }
    }

    #[test]
    fn defaults_match_their_kinds() {
        for factory in factories() {
            for descriptor in factory.properties {
                assert!(
                    descriptor.default_value().is_ok(),
                    "{}::{} has a bad default",
                    factory.name,
                    descriptor.name
                );
            }
        }
    }

    #[test]
    fn finds_known_factories() {
        assert_eq!(find_factory("fakesink").map(|f| f.pads), Some(PadLayout::Sink));
        assert!(find_factory("nosuchelement").is_none());
    }
}
