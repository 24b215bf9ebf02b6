mod utils;

use std::{sync::Arc, thread};

use opcx_server::{
    filters::{AccessControlFilter, AttributeOverride, LoggingFilter},
    AttributeContext, AttributeFilter, AttributeFilterContext,
};
use opcx_types::{
    AttributeId, DataValue, LocalizedText, NodeClass, NodeId, QualifiedName, StatusCode, UaError,
    Variant,
};
use utils::{entries, journal, node_with, session_context, Recorder};

const INTERNAL: AttributeContext = AttributeContext::Internal;

fn status<T: std::fmt::Debug>(result: Result<T, UaError>) -> StatusCode {
    result.unwrap_err().status()
}

#[test]
fn empty_chain_serves_every_base_attribute() {
    let node = node_with(vec![]);
    let expected: [(AttributeId, Variant); 7] = [
        (AttributeId::NodeId, NodeId::numeric(2, 1001).into()),
        (AttributeId::NodeClass, NodeClass::Variable.into()),
        (AttributeId::BrowseName, QualifiedName::new(2, "Pressure").into()),
        (AttributeId::DisplayName, LocalizedText::text("Pressure").into()),
        (AttributeId::Description, LocalizedText::text("Line pressure").into()),
        (AttributeId::WriteMask, 0u32.into()),
        (AttributeId::UserWriteMask, 0u32.into()),
    ];
    for (attribute_id, value) in &expected {
        assert_eq!(&node.get_attribute(&INTERNAL, *attribute_id).unwrap(), value);
    }
    assert_eq!(
        AttributeId::BASE.to_vec(),
        expected.iter().map(|(id, _)| *id).collect::<Vec<_>>()
    );
}

#[test]
fn attributes_outside_the_base_set_are_invalid() {
    let node = node_with(vec![]);
    for attribute_id in [AttributeId::Value, AttributeId::AccessLevel, AttributeId::EventNotifier] {
        assert_eq!(
            status(node.get_attribute(&INTERNAL, attribute_id)),
            StatusCode::BAD_ATTRIBUTE_ID_INVALID
        );
        assert_eq!(
            status(node.set_attribute(&INTERNAL, attribute_id, 1i32)),
            StatusCode::BAD_ATTRIBUTE_ID_INVALID
        );
    }
}

#[test]
fn filters_see_operations_in_chain_order() {
    let journal = journal();
    let node = node_with(vec![
        Recorder::new("a", &journal),
        Recorder::new("b", &journal),
        Recorder::new("c", &journal),
    ]);

    node.get_attribute(&INTERNAL, AttributeId::DisplayName).unwrap();
    node.set_write_mask(&INTERNAL, 0x3).unwrap();

    assert_eq!(
        entries(&journal),
        [
            "a:get:DisplayName",
            "b:get:DisplayName",
            "c:get:DisplayName",
            "a:set:WriteMask",
            "b:set:WriteMask",
            "c:set:WriteMask",
        ]
    );
}

#[test]
fn short_circuit_skips_the_rest_of_the_chain() {
    let journal = journal();
    let node = node_with(vec![
        Recorder::new("a", &journal),
        Arc::new(AttributeOverride::new(
            AttributeId::DisplayName,
            LocalizedText::text("Overridden"),
        )),
        Recorder::new("c", &journal),
    ]);

    assert_eq!(
        node.display_name(&INTERNAL).unwrap(),
        LocalizedText::text("Overridden")
    );
    assert_eq!(entries(&journal), ["a:get:DisplayName"]);

    // other attributes still reach the end of the chain
    assert_eq!(node.write_mask(&INTERNAL).unwrap(), 0);
    assert_eq!(
        entries(&journal),
        ["a:get:DisplayName", "a:get:WriteMask", "c:get:WriteMask"]
    );

    assert_eq!(
        status(node.set_display_name(&INTERNAL, LocalizedText::text("x"))),
        StatusCode::BAD_NOT_WRITABLE
    );
    assert_eq!(entries(&journal).last().unwrap(), "a:set:DisplayName");
}

#[test]
fn each_operation_reaches_the_stored_attributes_once() {
    let journal = journal();
    let node = node_with(vec![Recorder::new("last", &journal)]);

    for attribute_id in AttributeId::BASE {
        node.get_attribute(&INTERNAL, attribute_id).unwrap();
    }
    assert_eq!(entries(&journal).len(), AttributeId::BASE.len());
}

/// Rewrites display names on the way out and on the way in.
struct Shouting;

impl AttributeFilter for Shouting {
    fn get_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        let value = ctx.get_attribute(attribute_id)?;
        if attribute_id != AttributeId::DisplayName {
            return Ok(value);
        }
        let mut text = LocalizedText::try_from(value)?;
        text.text = text.text.map(|t| t.to_uppercase());
        Ok(text.into())
    }

    fn set_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), UaError> {
        let value = match (attribute_id, value) {
            (AttributeId::DisplayName, Variant::LocalizedText(text)) => {
                LocalizedText::new("en", text.text.unwrap_or_default()).into()
            }
            (_, value) => value,
        };
        ctx.set_attribute(attribute_id, value)
    }
}

#[test]
fn filters_can_rewrite_values_in_both_directions() {
    let node = node_with(vec![Arc::new(Shouting)]);
    node.set_display_name(&INTERNAL, LocalizedText::text("outlet valve"))
        .unwrap();
    assert_eq!(
        node.display_name(&INTERNAL).unwrap(),
        LocalizedText::new("en", "OUTLET VALVE")
    );
}

/// Only sessions named in `readers` may read, internal callers always can.
struct ReadRights {
    readers: &'static [&'static str],
}

impl AttributeFilter for ReadRights {
    fn get_attribute(
        &self,
        ctx: AttributeFilterContext<'_>,
        attribute_id: AttributeId,
    ) -> Result<Variant, UaError> {
        if let Some(session) = ctx.session() {
            if !self.readers.contains(&session.name()) {
                return Err(UaError::new(StatusCode::BAD_USER_ACCESS_DENIED));
            }
        }
        ctx.get_attribute(attribute_id)
    }
}

#[test]
fn internal_reads_bypass_session_checks() {
    let journal = journal();
    let node = node_with(vec![
        Arc::new(LoggingFilter::default()),
        Arc::new(AccessControlFilter),
        Arc::new(ReadRights {
            readers: &["engineer"],
        }),
        Recorder::new("stored", &journal),
    ]);

    assert_eq!(
        node.display_name(&INTERNAL).unwrap(),
        LocalizedText::text("Pressure")
    );
    let value = node.read_attribute(&INTERNAL, AttributeId::DisplayName.id()).unwrap();
    assert_eq!(value.status, StatusCode::GOOD);
    assert_eq!(value.value, Variant::from(LocalizedText::text("Pressure")));
    assert!(value.server_timestamp.is_some());

    let visitor = session_context("visitor");
    assert_eq!(
        status(node.display_name(&visitor)),
        StatusCode::BAD_USER_ACCESS_DENIED
    );
    assert_eq!(
        status(node.read_attribute(&visitor, AttributeId::DisplayName.id())),
        StatusCode::BAD_USER_ACCESS_DENIED
    );
    assert_eq!(
        node.display_name(&session_context("engineer")).unwrap(),
        LocalizedText::text("Pressure")
    );

    // denied reads never reach the stored attributes
    assert_eq!(entries(&journal).len(), 3);

    // writes by a session without write mask rights are denied as well
    assert_eq!(
        status(node.set_display_name(&visitor, LocalizedText::text("x"))),
        StatusCode::BAD_USER_ACCESS_DENIED
    );
    node.set_display_name(&INTERNAL, LocalizedText::text("Outlet pressure"))
        .unwrap();
}

#[test]
fn write_mask_round_trips_without_touching_fixed_attributes() {
    let node = node_with(vec![]);
    node.set_write_mask(&INTERNAL, 0x3).unwrap();
    assert_eq!(node.write_mask(&INTERNAL).unwrap(), 0x3);
    assert_eq!(node.node_id(&INTERNAL).unwrap(), NodeId::numeric(2, 1001));
    assert_eq!(node.node_class(&INTERNAL).unwrap(), NodeClass::Variable);
}

#[test]
fn node_id_and_node_class_are_not_writable() {
    let node = node_with(vec![]);
    assert_eq!(
        status(node.set_node_id(&INTERNAL, NodeId::numeric(2, 1))),
        StatusCode::BAD_NOT_WRITABLE
    );
    assert_eq!(
        status(node.set_node_class(&INTERNAL, NodeClass::Object)),
        StatusCode::BAD_NOT_WRITABLE
    );
    assert_eq!(node.node_class(&INTERNAL).unwrap(), NodeClass::Variable);
}

#[test]
fn unknown_numeric_attribute_ids_are_rejected() {
    let node = node_with(vec![]);
    assert_eq!(
        status(node.read_attribute(&INTERNAL, 9999)),
        StatusCode::BAD_ATTRIBUTE_ID_INVALID
    );
    assert_eq!(
        status(node.write_attribute(&INTERNAL, 9999, DataValue::new(1u32))),
        StatusCode::BAD_ATTRIBUTE_ID_INVALID
    );
}

#[test]
fn mistyped_writes_leave_the_node_unchanged() {
    let node = node_with(vec![]);
    assert_eq!(
        status(node.set_attribute(&INTERNAL, AttributeId::DisplayName, 5u32)),
        StatusCode::BAD_TYPE_MISMATCH
    );
    assert_eq!(
        status(node.write_attribute(&INTERNAL, AttributeId::WriteMask.id(), DataValue::new("all"))),
        StatusCode::BAD_TYPE_MISMATCH
    );
    assert_eq!(node.display_name(&INTERNAL).unwrap(), LocalizedText::text("Pressure"));
    assert_eq!(node.write_mask(&INTERNAL).unwrap(), 0);
}

#[test]
fn browse_names_are_validated_on_write() {
    let node = node_with(vec![]);
    for name in ["", "a/b", "ns:x", "Tank.Level"] {
        assert_eq!(
            status(node.set_browse_name(&INTERNAL, QualifiedName::new(2, name))),
            StatusCode::BAD_BROWSE_NAME_INVALID
        );
    }
    assert_eq!(
        status(node.write_attribute(
            &INTERNAL,
            AttributeId::BrowseName.id(),
            DataValue::new(QualifiedName::new(2, ""))
        )),
        StatusCode::BAD_BROWSE_NAME_INVALID
    );
    assert_eq!(
        node.browse_name(&INTERNAL).unwrap(),
        QualifiedName::new(2, "Pressure")
    );

    node.set_browse_name(&INTERNAL, QualifiedName::new(2, "Outlet_Pressure"))
        .unwrap();
    assert_eq!(
        node.browse_name(&INTERNAL).unwrap(),
        QualifiedName::new(2, "Outlet_Pressure")
    );
}

#[test]
fn bad_envelopes_are_rejected_with_their_status() {
    let node = node_with(vec![]);
    let value = DataValue::from_status(StatusCode::BAD_NODE_ID_UNKNOWN);
    assert_eq!(
        status(node.write_attribute(&INTERNAL, AttributeId::Description.id(), value)),
        StatusCode::BAD_NODE_ID_UNKNOWN
    );
}

#[test]
fn description_can_be_cleared() {
    let node = node_with(vec![]);
    node.set_description(&INTERNAL, None).unwrap();
    assert_eq!(node.description(&INTERNAL).unwrap(), None);
    assert_eq!(
        node.read_attribute(&INTERNAL, AttributeId::Description.id())
            .unwrap()
            .value,
        Variant::Empty
    );

    node.write_attribute(
        &INTERNAL,
        AttributeId::Description.id(),
        DataValue::new(LocalizedText::text("Inlet")),
    )
    .unwrap();
    assert_eq!(
        node.description(&INTERNAL).unwrap(),
        Some(LocalizedText::text("Inlet"))
    );
}

#[test]
fn typed_getters_reject_mistyped_filter_answers() {
    let node = node_with(vec![Arc::new(AttributeOverride::new(
        AttributeId::WriteMask,
        "not a mask",
    ))]);
    assert_eq!(status(node.write_mask(&INTERNAL)), StatusCode::BAD_TYPE_MISMATCH);
    assert_eq!(
        status(node.read_attribute(&INTERNAL, AttributeId::WriteMask.id())),
        StatusCode::BAD_TYPE_MISMATCH
    );
}

#[test]
fn access_control_checks_the_user_write_mask() {
    let node = node_with(vec![Arc::new(AccessControlFilter)]);
    let operator = session_context("operator");
    let display_name_bit = AttributeId::DisplayName.write_mask_bit().unwrap();

    assert_eq!(
        status(node.set_display_name(&operator, LocalizedText::text("x"))),
        StatusCode::BAD_USER_ACCESS_DENIED
    );

    // internal callers are trusted regardless of the mask
    node.set_user_write_mask(&INTERNAL, display_name_bit).unwrap();

    node.set_display_name(&operator, LocalizedText::text("Inlet pressure"))
        .unwrap();
    assert_eq!(
        node.display_name(&operator).unwrap(),
        LocalizedText::text("Inlet pressure")
    );
    assert_eq!(
        status(node.set_browse_name(&operator, QualifiedName::new(2, "Other"))),
        StatusCode::BAD_USER_ACCESS_DENIED
    );

    // attributes without a mask bit are not governed by the mask
    assert_eq!(
        status(node.set_attribute(&operator, AttributeId::Value, 1.5)),
        StatusCode::BAD_ATTRIBUTE_ID_INVALID
    );
}

#[test]
fn concurrent_operations_traverse_independently() {
    let journal = journal();
    let node = node_with(vec![
        Recorder::new("a", &journal),
        Recorder::new("b", &journal),
    ]);

    thread::scope(|s| {
        for i in 0..8u32 {
            let node = &node;
            s.spawn(move || {
                for _ in 0..50 {
                    node.set_user_write_mask(&INTERNAL, i).unwrap();
                    node.user_write_mask(&INTERNAL).unwrap();
                }
            });
        }
    });

    let entries = entries(&journal);
    assert_eq!(entries.len(), 8 * 50 * 2 * 2);
    let count = |entry: &str| entries.iter().filter(|e| *e == entry).count();
    assert_eq!(count("a:get:UserWriteMask"), count("b:get:UserWriteMask"));
    assert_eq!(count("a:set:UserWriteMask"), count("b:set:UserWriteMask"));
    assert!(node.user_write_mask(&INTERNAL).unwrap() < 8);
}
