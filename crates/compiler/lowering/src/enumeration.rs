use flatgen_decls::EnumerationDecl;

use crate::{EnumerationDefinition, EnumerationItem};

/// Lowers an enumeration under the given name
///
/// Members keep their declaration order and values. The caller registers the
/// result.
pub fn lower_enumeration(enumeration: &EnumerationDecl, assigned_name: &str) -> EnumerationDefinition {
    EnumerationDefinition {
        name: assigned_name.to_string(),
        members: enumeration
            .members
            .iter()
            .map(|member| EnumerationItem {
                name: member.name.clone(),
                value: member.value,
                documentation: member.documentation.clone(),
            })
            .collect(),
        documentation: enumeration.documentation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_keep_order_and_values() {
        let decl = EnumerationDecl::anonymous()
            .with_member("AV_FIELD_UNKNOWN", 0)
            .with_member("AV_FIELD_PROGRESSIVE", 1)
            .with_member("AV_FIELD_TT", -3);

        let lowered = lower_enumeration(&decl, "AVCodecParameters_field_order");

        assert_eq!(lowered.name, "AVCodecParameters_field_order");
        let members: Vec<_> = lowered
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.value))
            .collect();
        assert_eq!(
            members,
            vec![
                ("AV_FIELD_UNKNOWN", 0),
                ("AV_FIELD_PROGRESSIVE", 1),
                ("AV_FIELD_TT", -3)
            ]
        );
    }

    #[test]
    fn test_assigned_name_overrides_declared_name() {
        let decl = EnumerationDecl::named("AVMediaType").with_member("AVMEDIA_TYPE_VIDEO", 0);
        assert_eq!(lower_enumeration(&decl, "Stream_type").name, "Stream_type");
    }

    #[test]
    fn test_empty_enumeration() {
        let lowered = lower_enumeration(&EnumerationDecl::anonymous(), "Empty");
        assert!(lowered.members.is_empty());
        assert_eq!(lowered.documentation, None);
    }
}
