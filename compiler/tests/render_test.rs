#![cfg(test)]

use valibot_gen_compiler::{
    compile_files, render_file, synthesize_files,
    types::{FieldKind, MessageRef, ProtoField, ProtoFile, ProtoMessage},
    GenerateOptions, ProtovalidateResolver, SymbolRegistry, ValibotError,
};

fn message(name: &str, fields: Vec<ProtoField>) -> ProtoMessage {
    ProtoMessage {
        name:      name.to_string(),
        full_name: format!("test.{}", name),
        comment:   None,
        fields,
        oneofs:    vec![],
    }
}

fn reference(name: &str, file: &str) -> FieldKind {
    FieldKind::Message(MessageRef::new(&format!("test.{}", name), "test", file))
}

fn file(path: &str, messages: Vec<ProtoMessage>) -> ProtoFile {
    ProtoFile { path: path.to_string(), package: "test".to_string(), messages }
}

fn content<'a>(generated: &'a [valibot_gen_compiler::GeneratedFile], name: &str) -> &'a str {
    &generated
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("missing generated file {}", name))
        .content
}

#[test]
fn test_renders_complete_module() {
    let mut person = message(
        "Person",
        vec![
            ProtoField::new("name", FieldKind::String).required(),
            ProtoField::new("email", FieldKind::String),
        ],
    );
    person.comment = Some(" A person.\n".to_string());

    let generated = compile_files(
        &[file("sample/person.proto", vec![person])],
        &GenerateOptions::default(),
        &ProtovalidateResolver,
    )
    .unwrap();

    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].name, "sample/person.valibot.ts");
    assert_eq!(
        generated[0].content,
        "// Code generated by protoc-gen-valibot. DO NOT EDIT.\n\
         // source: sample/person.proto\n\
         \n\
         // eslint-disable\n\
         // biome-ignore-all format lint: generated code\n\
         \n\
         import { intersect, minLength, object, partial, pipe, string } from 'valibot';\n\
         \n\
         /** A person. */\n\
         export const PersonSchema = () => intersect([object({\n\
         \tname: pipe(string(), minLength(1))\n\
         }), partial(object({\n\
         \temail: string()\n\
         }))])\n"
    );
}

#[test]
fn test_declarations_are_separated_by_blank_lines() {
    let generated = compile_files(
        &[file("two.proto", vec![message("B", vec![]), message("A", vec![])])],
        &GenerateOptions::default(),
        &ProtovalidateResolver,
    )
    .unwrap();

    assert!(generated[0].content.ends_with(
        "export const ASchema = () => intersect([object({}), partial(object({}))])\n\
         \n\
         export const BSchema = () => intersect([object({}), partial(object({}))])\n"
    ));
}

#[test]
fn test_cross_file_references_import_from_the_owning_module() {
    // x.proto and y.proto refer to each other, and x.proto refers to itself.
    let x = file(
        "x.proto",
        vec![
            message(
                "A",
                vec![
                    ProtoField::new("b", reference("B", "y.proto")),
                    ProtoField::new("again", reference("A", "x.proto")),
                    ProtoField::new("c", reference("C", "x.proto")),
                ],
            ),
            message("C", vec![]),
        ],
    );
    let y = file("y.proto", vec![message("B", vec![ProtoField::new("a", reference("A", "x.proto")).list()])]);

    let generated = compile_files(&[x, y], &GenerateOptions::default(), &ProtovalidateResolver).unwrap();

    let x_out = content(&generated, "x.valibot.ts");
    assert!(x_out.contains(
        "import { intersect, object, partial } from 'valibot';\nimport { BSchema } from './y.valibot';\n\n"
    ));
    assert!(!x_out.contains("import { ASchema"));
    assert!(!x_out.contains("CSchema }"));
    assert!(x_out.contains("\tagain: ASchema(),\n\tc: CSchema()"));

    let y_out = content(&generated, "y.valibot.ts");
    assert!(y_out.contains(
        "import { array, intersect, object, partial } from 'valibot';\nimport { ASchema } from './x.valibot';\n\n"
    ));
}

#[test]
fn test_imports_use_relative_paths_between_directories() {
    let order = file(
        "shop/orders/order.proto",
        vec![message(
            "Order",
            vec![
                ProtoField::new("price", reference("Money", "shop/common/money.proto")),
                ProtoField::new("currency", reference("Currency", "shop/common/money.proto")),
                ProtoField::new("user", reference("User", "users.proto")),
            ],
        )],
    );
    let money = file("shop/common/money.proto", vec![message("Money", vec![]), message("Currency", vec![])]);
    let users = file("users.proto", vec![message("User", vec![])]);

    let generated = compile_files(&[order, money, users], &GenerateOptions::default(), &ProtovalidateResolver).unwrap();

    let out = content(&generated, "shop/orders/order.valibot.ts");
    assert!(out.contains(
        "import { intersect, object, partial } from 'valibot';\n\
         import { UserSchema } from '../../users.valibot';\n\
         import { CurrencySchema, MoneySchema } from '../common/money.valibot';\n\n"
    ));
}

#[test]
fn test_missing_referenced_file_is_fatal() {
    let x = file("x.proto", vec![message("A", vec![ProtoField::new("b", reference("B", "y.proto"))])]);

    let result = compile_files(&[x], &GenerateOptions::default(), &ProtovalidateResolver);
    match result {
        Err(ValibotError::UnresolvedReference { symbol, file }) => {
            assert_eq!(symbol, "BSchema");
            assert_eq!(file, "x.proto");
        }
        other => panic!("expected unresolved reference, got {:?}", other),
    }
}

#[test]
fn test_reference_to_a_file_that_does_not_export_the_symbol_is_fatal() {
    // Another file exports BSchema, but not the one the field points at.
    let x = file("x.proto", vec![message("A", vec![ProtoField::new("b", reference("B", "y.proto"))])]);
    let z = file("z.proto", vec![message("B", vec![])]);

    let result = compile_files(&[x, z], &GenerateOptions::default(), &ProtovalidateResolver);
    assert!(matches!(result, Err(ValibotError::UnresolvedReference { .. })));
}

#[test]
fn test_registry_is_built_from_every_file() {
    let modules = synthesize_files(
        &[
            file("x.proto", vec![message("A", vec![]), message("C", vec![])]),
            file("y.proto", vec![message("B", vec![])]),
        ],
        &GenerateOptions::default(),
        &ProtovalidateResolver,
    )
    .unwrap();

    let registry = SymbolRegistry::build(&modules);
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.owner("BSchema", Some("y.proto")), Some("y.proto"));
    assert_eq!(registry.owner("BSchema", Some("x.proto")), None);
    assert_eq!(registry.owner("ASchema", None), Some("x.proto"));
    assert_eq!(registry.owner("DSchema", None), None);

    // A module without messages renders its header only.
    let empty = synthesize_files(&[file("empty.proto", vec![])], &GenerateOptions::default(), &ProtovalidateResolver)
        .unwrap();
    let text = render_file(&empty[0], &registry).unwrap();
    assert_eq!(
        text,
        "// Code generated by protoc-gen-valibot. DO NOT EDIT.\n// source: empty.proto\n\n// eslint-disable\n// biome-ignore-all format lint: generated code\n\n"
    );
}

#[test]
fn test_importing_a_locally_declared_name_is_fatal() {
    // x.proto declares Status and also refers to the Status of y.proto.
    let x = file(
        "x.proto",
        vec![message("A", vec![ProtoField::new("status", reference("Status", "y.proto"))]), message("Status", vec![])],
    );
    let y = file("y.proto", vec![message("Status", vec![])]);

    let result = compile_files(&[x, y], &GenerateOptions::default(), &ProtovalidateResolver);
    match result {
        Err(ValibotError::ShadowedReference { symbol, file, owner }) => {
            assert_eq!(symbol, "StatusSchema");
            assert_eq!(file, "x.proto");
            assert_eq!(owner, "y.proto");
        }
        other => panic!("expected shadowed reference, got {:?}", other),
    }
}
