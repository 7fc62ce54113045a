//! The node table.
//!
//! Every category and every concrete node kind is declared exactly once here.
//! `with_ast_table!(callback)` hands the whole table to a generator macro;
//! `nodes`, `visitor` and `transformer` each run their own generator over it,
//! so node structs, slot metadata, the category map and both dispatch trait
//! families can never disagree about a kind.
//!
//! Grammar of an abstract category row:
//!
//! ```text
//! Name: Parent [SecondarySupertypes...] => visit_method, transform_method;
//! ```
//!
//! Grammar of a node row:
//!
//! ```text
//! Name: Parent [SecondarySupertypes...] => visit_method, transform_method {
//!     slots { slot_name: SlotKind SlotCategory, ... }
//!     attrs { attr_name: Type, ... }
//!     type_rule(rule)
//! }
//! ```
//!
//! Slot kinds are `One`, `Opt`, `List`, `Back`, `Shared` and `SharedOpt`
//! (see [`crate::slots::SlotKind`]). Slots are listed in traversal order.
//! Type rules are `none`, `own(slot)`, `child(slot)`, `child_node(slot)` and
//! `builtin(BuiltinType)` (see [`crate::nodes::TypeRule`]).
//!
//! `Element` is the implicit root of the category lattice and is not listed.

macro_rules! with_ast_table {
    ($callback:ident) => {
        $callback! {
            categories {
                Statement: Element [] => visit_statement, transform_statement;
                Expression: Statement [] => visit_expression, transform_expression;
                Declaration: Element [] => visit_declaration, transform_declaration;
                AnnotatedDeclaration: Declaration [] => visit_annotated_declaration, transform_annotated_declaration;
                TypedDeclaration: AnnotatedDeclaration [] => visit_typed_declaration, transform_typed_declaration;
                CallableDeclaration: TypedDeclaration [] => visit_callable_declaration, transform_callable_declaration;
                Variable: CallableDeclaration [Statement] => visit_variable, transform_variable;
                Function: CallableDeclaration [Statement, TargetElement] => visit_function, transform_function;
                ClassLikeDeclaration: AnnotatedDeclaration [Statement] => visit_class_like_declaration, transform_class_like_declaration;
                Class: ClassLikeDeclaration [] => visit_class, transform_class;
                TargetElement: Element [] => visit_target_element, transform_target_element;
                Loop: Statement [TargetElement] => visit_loop, transform_loop;
                Jump: Expression [] => visit_jump, transform_jump;
                LoopJump: Jump [] => visit_loop_jump, transform_loop_jump;
                QualifiedAccess: Expression [] => visit_qualified_access, transform_qualified_access;
                Call: QualifiedAccess [] => visit_call, transform_call;
                WrappedExpression: Expression [] => visit_wrapped_expression, transform_wrapped_expression;
                WrappedArgumentExpression: WrappedExpression [] => visit_wrapped_argument_expression, transform_wrapped_argument_expression;
                Reference: Element [] => visit_reference, transform_reference;
                NamedReference: Reference [] => visit_named_reference, transform_named_reference;
                Type: Element [] => visit_type, transform_type;
                TypeProjection: Element [] => visit_type_projection, transform_type_projection;
            }
            nodes {
                // Files and declarations

                ModuleFragment: Element [] => visit_module_fragment, transform_module_fragment {
                    slots { files: List File }
                    attrs { name: Atom }
                    type_rule(none)
                }
                File: Declaration [] => visit_file, transform_file {
                    slots {
                        annotations: List AnnotationCall,
                        imports: List Import,
                        declarations: List Declaration,
                    }
                    attrs { name: Atom, package_fq_name: Atom }
                    type_rule(none)
                }
                Import: Element [] => visit_import, transform_import {
                    slots {}
                    attrs { imported_fq_name: Atom, is_all_under: bool, alias_name: Option<Atom> }
                    type_rule(none)
                }
                AnonymousInitializer: Declaration [] => visit_anonymous_initializer, transform_anonymous_initializer {
                    slots { annotations: List AnnotationCall, body: Opt Block }
                    attrs {}
                    type_rule(none)
                }
                TypeParameter: AnnotatedDeclaration [] => visit_type_parameter, transform_type_parameter {
                    slots { annotations: List AnnotationCall, bounds: List Type }
                    attrs { name: Atom, variance: Variance, is_reified: bool, symbol: SymbolId }
                    type_rule(none)
                }
                ValueParameter: Variable [] => visit_value_parameter, transform_value_parameter {
                    slots {
                        annotations: List AnnotationCall,
                        return_type: One Type,
                        default_value: Opt Expression,
                    }
                    attrs {
                        name: Atom,
                        is_crossinline: bool,
                        is_noinline: bool,
                        is_vararg: bool,
                        symbol: SymbolId,
                    }
                    type_rule(none)
                }
                Property: Variable [] => visit_property, transform_property {
                    slots {
                        annotations: List AnnotationCall,
                        type_parameters: List TypeParameter,
                        receiver_type: Opt Type,
                        return_type: One Type,
                        initializer: Opt Expression,
                        delegate: Opt Expression,
                        getter: Opt PropertyAccessor,
                        setter: Opt PropertyAccessor,
                    }
                    attrs {
                        name: Atom,
                        is_var: bool,
                        is_local: bool,
                        visibility: Visibility,
                        modality: Modality,
                        symbol: SymbolId,
                    }
                    type_rule(none)
                }
                Field: Variable [] => visit_field, transform_field {
                    slots {
                        annotations: List AnnotationCall,
                        return_type: One Type,
                        initializer: Opt Expression,
                    }
                    attrs { name: Atom, is_var: bool, visibility: Visibility, symbol: SymbolId }
                    type_rule(none)
                }
                EnumEntry: Variable [] => visit_enum_entry, transform_enum_entry {
                    slots {
                        annotations: List AnnotationCall,
                        return_type: One Type,
                        initializer: Opt Expression,
                    }
                    attrs { name: Atom, symbol: SymbolId }
                    type_rule(none)
                }
                RegularClass: Class [] => visit_regular_class, transform_regular_class {
                    slots {
                        annotations: List AnnotationCall,
                        type_parameters: List TypeParameter,
                        super_types: List Type,
                        declarations: List Declaration,
                    }
                    attrs {
                        name: Atom,
                        class_kind: ClassKind,
                        visibility: Visibility,
                        modality: Modality,
                        is_companion: bool,
                        is_inner: bool,
                        is_data: bool,
                        symbol: SymbolId,
                    }
                    type_rule(none)
                }
                AnonymousObject: Class [Expression] => visit_anonymous_object, transform_anonymous_object {
                    slots {
                        annotations: List AnnotationCall,
                        super_types: List Type,
                        declarations: List Declaration,
                        ty: One Type,
                    }
                    attrs { symbol: SymbolId }
                    type_rule(own(ty))
                }
                TypeAlias: ClassLikeDeclaration [] => visit_type_alias, transform_type_alias {
                    slots {
                        annotations: List AnnotationCall,
                        type_parameters: List TypeParameter,
                        expanded_type: One Type,
                    }
                    attrs { name: Atom, visibility: Visibility, symbol: SymbolId }
                    type_rule(none)
                }
                NamedFunction: Function [] => visit_named_function, transform_named_function {
                    slots {
                        annotations: List AnnotationCall,
                        type_parameters: List TypeParameter,
                        receiver_type: Opt Type,
                        value_parameters: List ValueParameter,
                        return_type: One Type,
                        body: Opt Block,
                    }
                    attrs {
                        name: Atom,
                        visibility: Visibility,
                        modality: Modality,
                        is_suspend: bool,
                        is_inline: bool,
                        is_operator: bool,
                        is_infix: bool,
                        symbol: SymbolId,
                    }
                    type_rule(none)
                }
                PropertyAccessor: Function [] => visit_property_accessor, transform_property_accessor {
                    slots {
                        annotations: List AnnotationCall,
                        value_parameters: List ValueParameter,
                        return_type: One Type,
                        body: Opt Block,
                    }
                    attrs { is_getter: bool, visibility: Visibility, symbol: SymbolId }
                    type_rule(none)
                }
                Constructor: Function [] => visit_constructor, transform_constructor {
                    slots {
                        annotations: List AnnotationCall,
                        value_parameters: List ValueParameter,
                        return_type: One Type,
                        delegated_constructor: Opt DelegatedConstructorCall,
                        body: Opt Block,
                    }
                    attrs { is_primary: bool, visibility: Visibility, symbol: SymbolId }
                    type_rule(none)
                }
                AnonymousFunction: Function [Expression] => visit_anonymous_function, transform_anonymous_function {
                    slots {
                        annotations: List AnnotationCall,
                        label: Opt Label,
                        receiver_type: Opt Type,
                        value_parameters: List ValueParameter,
                        return_type: One Type,
                        body: Opt Block,
                        ty: One Type,
                    }
                    attrs { is_lambda: bool, symbol: SymbolId }
                    type_rule(own(ty))
                }

                // Control flow

                Label: Element [] => visit_label, transform_label {
                    slots {}
                    attrs { name: Atom }
                    type_rule(none)
                }
                WhileLoop: Loop [] => visit_while_loop, transform_while_loop {
                    slots {
                        annotations: List AnnotationCall,
                        label: Opt Label,
                        condition: One Expression,
                        block: One Block,
                    }
                    attrs {}
                    type_rule(builtin(Unit))
                }
                DoWhileLoop: Loop [] => visit_do_while_loop, transform_do_while_loop {
                    slots {
                        annotations: List AnnotationCall,
                        label: Opt Label,
                        block: One Block,
                        condition: One Expression,
                    }
                    attrs {}
                    type_rule(builtin(Unit))
                }
                Block: Expression [] => visit_block, transform_block {
                    slots {
                        annotations: List AnnotationCall,
                        statements: List Statement,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                BinaryLogicExpression: Expression [] => visit_binary_logic_expression, transform_binary_logic_expression {
                    slots {
                        annotations: List AnnotationCall,
                        left_operand: One Expression,
                        right_operand: One Expression,
                        ty: One Type,
                    }
                    attrs { operation_kind: LogicOperationKind }
                    type_rule(own(ty))
                }
                Break: Statement [] => visit_break, transform_break {
                    slots { target: One Loop }
                    attrs {}
                    type_rule(none)
                }
                Continue: Statement [] => visit_continue, transform_continue {
                    slots { target: One Loop }
                    attrs {}
                    type_rule(none)
                }
                BreakExpression: LoopJump [] => visit_break_expression, transform_break_expression {
                    slots {
                        annotations: List AnnotationCall,
                        target: Back Loop,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                ContinueExpression: LoopJump [] => visit_continue_expression, transform_continue_expression {
                    slots {
                        annotations: List AnnotationCall,
                        target: Back Loop,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                ReturnExpression: Jump [] => visit_return_expression, transform_return_expression {
                    slots {
                        annotations: List AnnotationCall,
                        target: Back Function,
                        result: One Expression,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                ThrowExpression: Expression [] => visit_throw_expression, transform_throw_expression {
                    slots {
                        annotations: List AnnotationCall,
                        exception: One Expression,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                Catch: Element [] => visit_catch, transform_catch {
                    slots { parameter: One ValueParameter, block: One Block }
                    attrs {}
                    type_rule(none)
                }
                TryExpression: Expression [] => visit_try_expression, transform_try_expression {
                    slots {
                        annotations: List AnnotationCall,
                        try_block: One Block,
                        catches: List Catch,
                        finally_block: Opt Block,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                WhenExpression: Expression [] => visit_when_expression, transform_when_expression {
                    slots {
                        annotations: List AnnotationCall,
                        subject: Opt Expression,
                        branches: List WhenBranch,
                        ty: One Type,
                    }
                    attrs { is_exhaustive: bool }
                    type_rule(own(ty))
                }
                WhenBranch: Element [] => visit_when_branch, transform_when_branch {
                    slots { condition: One Expression, result: One Block }
                    attrs {}
                    type_rule(none)
                }
                WhenSubjectExpression: Expression [] => visit_when_subject_expression, transform_when_subject_expression {
                    slots {
                        annotations: List AnnotationCall,
                        when_ref: Back WhenExpression,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                ElseIfTrueCondition: Expression [] => visit_else_if_true_condition, transform_else_if_true_condition {
                    slots { annotations: List AnnotationCall }
                    attrs {}
                    type_rule(builtin(Boolean))
                }
                UnitLiteral: Expression [] => visit_unit_literal, transform_unit_literal {
                    slots { annotations: List AnnotationCall }
                    attrs {}
                    type_rule(builtin(Unit))
                }
                ConstExpression: Expression [] => visit_const_expression, transform_const_expression {
                    slots { annotations: List AnnotationCall, ty: One Type }
                    attrs { value: ConstValue }
                    type_rule(own(ty))
                }
                ElvisExpression: Expression [] => visit_elvis_expression, transform_elvis_expression {
                    slots {
                        annotations: List AnnotationCall,
                        lhs: One Expression,
                        rhs: One Expression,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }

                // Calls and accesses

                ArgumentList: Element [] => visit_argument_list, transform_argument_list {
                    slots { arguments: List Expression }
                    attrs {}
                    type_rule(none)
                }
                FunctionCall: Call [] => visit_function_call, transform_function_call {
                    slots {
                        annotations: List AnnotationCall,
                        type_arguments: List TypeProjection,
                        explicit_receiver: SharedOpt Expression,
                        dispatch_receiver: SharedOpt Expression,
                        extension_receiver: SharedOpt Expression,
                        callee_reference: One NamedReference,
                        argument_list: One ArgumentList,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                ComponentCall: FunctionCall [] => visit_component_call, transform_component_call {
                    slots {
                        annotations: List AnnotationCall,
                        type_arguments: List TypeProjection,
                        explicit_receiver: Shared Expression,
                        dispatch_receiver: SharedOpt Expression,
                        extension_receiver: SharedOpt Expression,
                        callee_reference: One NamedReference,
                        argument_list: One ArgumentList,
                        ty: One Type,
                    }
                    attrs { component_index: u32 }
                    type_rule(own(ty))
                }
                AnnotationCall: Call [] => visit_annotation_call, transform_annotation_call {
                    slots { annotation_type: One Type, argument_list: One ArgumentList }
                    attrs {
                        use_site_target: Option<UseSiteTarget>,
                        resolve_status: AnnotationResolveStatus,
                    }
                    type_rule(child_node(annotation_type))
                }
                DelegatedConstructorCall: Call [] => visit_delegated_constructor_call, transform_delegated_constructor_call {
                    slots {
                        constructed_type: One Type,
                        dispatch_receiver: Opt Expression,
                        callee_reference: One Reference,
                        argument_list: One ArgumentList,
                    }
                    attrs { is_this: bool }
                    type_rule(child_node(constructed_type))
                }
                QualifiedAccessExpression: QualifiedAccess [] => visit_qualified_access_expression, transform_qualified_access_expression {
                    slots {
                        annotations: List AnnotationCall,
                        type_arguments: List TypeProjection,
                        explicit_receiver: SharedOpt Expression,
                        dispatch_receiver: SharedOpt Expression,
                        extension_receiver: SharedOpt Expression,
                        callee_reference: One Reference,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                CallableReferenceAccess: QualifiedAccess [] => visit_callable_reference_access, transform_callable_reference_access {
                    slots {
                        annotations: List AnnotationCall,
                        type_arguments: List TypeProjection,
                        explicit_receiver: SharedOpt Expression,
                        dispatch_receiver: SharedOpt Expression,
                        extension_receiver: SharedOpt Expression,
                        callee_reference: One NamedReference,
                        ty: One Type,
                    }
                    attrs { has_question_mark_at_lhs: bool }
                    type_rule(own(ty))
                }
                ThisReceiverExpression: QualifiedAccess [] => visit_this_receiver_expression, transform_this_receiver_expression {
                    slots {
                        annotations: List AnnotationCall,
                        callee_reference: One ThisReference,
                        ty: One Type,
                    }
                    attrs { is_implicit: bool }
                    type_rule(own(ty))
                }
                ExpressionWithSmartcast: QualifiedAccess [] => visit_expression_with_smartcast, transform_expression_with_smartcast {
                    slots {
                        annotations: List AnnotationCall,
                        original_expression: One QualifiedAccessExpression,
                        original_type: One Type,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                VariableAssignment: QualifiedAccess [] => visit_variable_assignment, transform_variable_assignment {
                    slots {
                        annotations: List AnnotationCall,
                        explicit_receiver: SharedOpt Expression,
                        dispatch_receiver: SharedOpt Expression,
                        extension_receiver: SharedOpt Expression,
                        l_value: One Reference,
                        r_value: One Expression,
                    }
                    attrs {}
                    type_rule(builtin(Unit))
                }
                ComparisonExpression: Expression [] => visit_comparison_expression, transform_comparison_expression {
                    slots {
                        annotations: List AnnotationCall,
                        compare_to_call: One FunctionCall,
                        ty: One Type,
                    }
                    attrs { operation: Operation }
                    type_rule(own(ty))
                }
                TypeOperatorCall: Expression [Call] => visit_type_operator_call, transform_type_operator_call {
                    slots {
                        annotations: List AnnotationCall,
                        argument_list: One ArgumentList,
                        conversion_type: One Type,
                        ty: One Type,
                    }
                    attrs { operation: Operation }
                    type_rule(own(ty))
                }
                EqualityOperatorCall: Expression [Call] => visit_equality_operator_call, transform_equality_operator_call {
                    slots {
                        annotations: List AnnotationCall,
                        argument_list: One ArgumentList,
                        ty: One Type,
                    }
                    attrs { operation: Operation }
                    type_rule(own(ty))
                }
                AssignmentOperatorStatement: Statement [] => visit_assignment_operator_statement, transform_assignment_operator_statement {
                    slots {
                        annotations: List AnnotationCall,
                        left_argument: One Expression,
                        right_argument: One Expression,
                    }
                    attrs { operation: Operation }
                    type_rule(none)
                }
                GetClassCall: Expression [Call] => visit_get_class_call, transform_get_class_call {
                    slots {
                        annotations: List AnnotationCall,
                        argument_list: One ArgumentList,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                StringConcatenationCall: Expression [Call] => visit_string_concatenation_call, transform_string_concatenation_call {
                    slots {
                        annotations: List AnnotationCall,
                        argument_list: One ArgumentList,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                ClassReferenceExpression: Expression [] => visit_class_reference_expression, transform_class_reference_expression {
                    slots {
                        annotations: List AnnotationCall,
                        class_type: One Type,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                SafeCallExpression: Expression [] => visit_safe_call_expression, transform_safe_call_expression {
                    slots {
                        annotations: List AnnotationCall,
                        receiver: One Expression,
                        checked_subject: Back CheckedSafeCallSubject,
                        regular_qualified_access: One QualifiedAccess,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                CheckedSafeCallSubject: Expression [] => visit_checked_safe_call_subject, transform_checked_safe_call_subject {
                    slots {
                        annotations: List AnnotationCall,
                        original_receiver: Back Expression,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }

                // Wrapped expressions

                LambdaArgumentExpression: WrappedArgumentExpression [] => visit_lambda_argument_expression, transform_lambda_argument_expression {
                    slots { annotations: List AnnotationCall, expression: One Expression }
                    attrs {}
                    type_rule(child(expression))
                }
                SpreadArgumentExpression: WrappedArgumentExpression [] => visit_spread_argument_expression, transform_spread_argument_expression {
                    slots { annotations: List AnnotationCall, expression: One Expression }
                    attrs { is_spread: bool }
                    type_rule(child(expression))
                }
                NamedArgumentExpression: WrappedArgumentExpression [] => visit_named_argument_expression, transform_named_argument_expression {
                    slots { annotations: List AnnotationCall, expression: One Expression }
                    attrs { name: Atom, is_spread: bool }
                    type_rule(child(expression))
                }
                WrappedDelegateExpression: WrappedExpression [] => visit_wrapped_delegate_expression, transform_wrapped_delegate_expression {
                    slots {
                        annotations: List AnnotationCall,
                        expression: One Expression,
                        delegate_provider: One Expression,
                    }
                    attrs {}
                    type_rule(child(expression))
                }
                VarargArgumentsExpression: Expression [] => visit_vararg_arguments_expression, transform_vararg_arguments_expression {
                    slots {
                        annotations: List AnnotationCall,
                        arguments: List Expression,
                        vararg_element_type: One Type,
                        ty: One Type,
                    }
                    attrs {}
                    type_rule(own(ty))
                }
                ResolvedQualifier: Expression [] => visit_resolved_qualifier, transform_resolved_qualifier {
                    slots {
                        annotations: List AnnotationCall,
                        type_arguments: List TypeProjection,
                        ty: One Type,
                    }
                    attrs { package_fq_name: Atom, class_name: Option<Atom>, symbol: Option<SymbolId> }
                    type_rule(own(ty))
                }

                // References

                SimpleNamedReference: NamedReference [] => visit_simple_named_reference, transform_simple_named_reference {
                    slots {}
                    attrs { name: Atom }
                    type_rule(none)
                }
                ResolvedNamedReference: NamedReference [] => visit_resolved_named_reference, transform_resolved_named_reference {
                    slots {}
                    attrs { name: Atom, resolved_symbol: SymbolId }
                    type_rule(none)
                }
                ResolvedCallableReference: ResolvedNamedReference [] => visit_resolved_callable_reference, transform_resolved_callable_reference {
                    slots { inferred_type_arguments: List Type }
                    attrs { name: Atom, resolved_symbol: SymbolId }
                    type_rule(none)
                }
                BackingFieldReference: ResolvedNamedReference [] => visit_backing_field_reference, transform_backing_field_reference {
                    slots {}
                    attrs { resolved_symbol: SymbolId }
                    type_rule(none)
                }
                DelegateFieldReference: ResolvedNamedReference [] => visit_delegate_field_reference, transform_delegate_field_reference {
                    slots {}
                    attrs { resolved_symbol: SymbolId }
                    type_rule(none)
                }
                SuperReference: Reference [] => visit_super_reference, transform_super_reference {
                    slots { super_type: One Type }
                    attrs { label_name: Option<Atom> }
                    type_rule(none)
                }
                ThisReference: Reference [] => visit_this_reference, transform_this_reference {
                    slots {}
                    attrs { label_name: Option<Atom>, bound_symbol: Option<SymbolId> }
                    type_rule(none)
                }

                // Types

                SimpleType: Type [] => visit_simple_type, transform_simple_type {
                    slots { annotations: List AnnotationCall, arguments: List TypeProjection }
                    attrs { name: Atom, is_marked_nullable: bool }
                    type_rule(none)
                }
                FunctionType: Type [] => visit_function_type, transform_function_type {
                    slots {
                        annotations: List AnnotationCall,
                        receiver_type: Opt Type,
                        value_parameter_types: List Type,
                        return_type: One Type,
                    }
                    attrs { is_marked_nullable: bool, is_suspend: bool }
                    type_rule(none)
                }
                ImplicitBuiltinType: Type [] => visit_implicit_builtin_type, transform_implicit_builtin_type {
                    slots {}
                    attrs { builtin: BuiltinType }
                    type_rule(none)
                }
                StarProjection: TypeProjection [] => visit_star_projection, transform_star_projection {
                    slots {}
                    attrs {}
                    type_rule(none)
                }
                TypeProjectionWithVariance: TypeProjection [] => visit_type_projection_with_variance, transform_type_projection_with_variance {
                    slots { ty: One Type }
                    attrs { variance: Variance }
                    type_rule(none)
                }
            }
        }
    };
}
