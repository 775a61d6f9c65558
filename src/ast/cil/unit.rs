//! The host-level compilation unit.
//!
//! A [`CilUnit`] holds everything the pipeline processes for one recovered method body:
//! the node arena, one root block per control flow node, and the variable table.
//!
//! All node construction and destruction goes through the unit so the variable
//! definition/use sets stay consistent with the trees. A subtree detached with
//! [`detach`](CilUnit::detach) keeps its registrations (it is expected to be reattached,
//! e.g. when an expression is moved); [`discard`](CilUnit::discard) and
//! [`replace`](CilUnit::replace) unregister the nodes that leave the unit for good.

use std::collections::BTreeMap;

use crate::{
    ast::{
        arena::AstArena,
        cil::{
            CilAssignment, CilBlock, CilExpressionStatement, CilInstruction, CilNode, CilOp,
            CilOperand, CilVariable, CilVariableExpression, VariableId,
        },
        CfgNodeId, NodeId,
    },
    types::TypeRef,
    Error, Result,
};

/// IR and variable table for one recovered method body.
pub struct CilUnit {
    arena: AstArena<CilNode>,
    blocks: BTreeMap<CfgNodeId, NodeId>,
    variables: Vec<CilVariable>,
}

impl Default for CilUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl CilUnit {
    /// Creates an empty unit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: AstArena::new(),
            blocks: BTreeMap::new(),
            variables: Vec::new(),
        }
    }

    /// The node arena backing this unit's trees.
    #[must_use]
    pub fn arena(&self) -> &AstArena<CilNode> {
        &self.arena
    }

    /// Borrows a node's payload.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &CilNode {
        self.arena.payload(id)
    }

    /// Mutably borrows a node's payload.
    ///
    /// For attribute edits (expression types, operands). Child ids and variable
    /// references must not be rewritten through this; structural changes go through the
    /// unit's mutation methods.
    pub fn node_mut(&mut self, id: NodeId) -> &mut CilNode {
        self.arena.payload_mut(id)
    }

    /// Root blocks by control flow node, in control-flow-node order.
    pub fn blocks(&self) -> impl Iterator<Item = (CfgNodeId, NodeId)> + '_ {
        self.blocks.iter().map(|(&cfg, &block)| (cfg, block))
    }

    /// The root block associated with `cfg`, if any.
    #[must_use]
    pub fn block(&self, cfg: CfgNodeId) -> Option<NodeId> {
        self.blocks.get(&cfg).copied()
    }

    // ------------------------------------------------------------------
    // Variable table
    // ------------------------------------------------------------------

    /// Declares a new variable and returns its id.
    pub fn new_variable(&mut self, name: impl Into<String>, declared_type: TypeRef) -> VariableId {
        let id = VariableId::new(self.variables.len());
        self.variables
            .push(CilVariable::new(name.into(), declared_type));
        id
    }

    /// Borrows a variable.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> &CilVariable {
        &self.variables[id.index()]
    }

    /// Iterates the variable table.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &CilVariable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, variable)| (VariableId::new(index), variable))
    }

    /// Number of declared variables.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Changes a variable's declared type and overwrites the expression type of every
    /// expression reading it.
    pub fn retype_variable(&mut self, id: VariableId, new_type: TypeRef) {
        let uses: Vec<NodeId> = self.variables[id.index()].used_by.iter().copied().collect();
        for use_site in uses {
            if let CilNode::VariableExpression(expr) = self.arena.payload_mut(use_site) {
                expr.expression_type = Some(new_type.clone());
            }
        }
        self.variables[id.index()].set_declared_type(new_type);
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    /// Creates the root block for a control flow node.
    ///
    /// # Errors
    ///
    /// Fails when `cfg` already has a block, or when a statement is already attached
    /// elsewhere.
    pub fn new_block(&mut self, cfg: CfgNodeId, statements: Vec<NodeId>) -> Result<NodeId> {
        if self.blocks.contains_key(&cfg) {
            return Err(Error::Error(format!(
                "control flow node {cfg} already has a block"
            )));
        }
        let id = self.arena.alloc(CilNode::Block(CilBlock {
            statements,
            cfg_node: Some(cfg),
        }))?;
        self.blocks.insert(cfg, id);
        Ok(id)
    }

    /// Creates an assignment statement writing `value` into `variable`, registering the
    /// definition edge.
    ///
    /// # Errors
    ///
    /// Fails when `value` is already attached elsewhere.
    pub fn assignment(&mut self, variable: VariableId, value: NodeId) -> Result<NodeId> {
        let id = self.arena.alloc(CilNode::Assignment(CilAssignment {
            variable,
            value: Some(value),
        }))?;
        self.variables[variable.index()].assigned_by.insert(id);
        Ok(id)
    }

    /// Creates an expression statement.
    ///
    /// # Errors
    ///
    /// Fails when `expression` is already attached elsewhere.
    pub fn expression_statement(&mut self, expression: NodeId) -> Result<NodeId> {
        let id = self
            .arena
            .alloc(CilNode::ExpressionStatement(CilExpressionStatement {
                expression: Some(expression),
            }))?;
        Ok(id)
    }

    /// Creates an instruction expression.
    ///
    /// # Errors
    ///
    /// Fails when any argument is already attached elsewhere.
    pub fn instruction(
        &mut self,
        op: CilOp,
        operand: Option<CilOperand>,
        arguments: Vec<NodeId>,
        expression_type: Option<TypeRef>,
    ) -> Result<NodeId> {
        let id = self.arena.alloc(CilNode::Instruction(CilInstruction {
            op,
            operand,
            arguments,
            expression_type,
        }))?;
        Ok(id)
    }

    /// Creates an expression reading `variable`, registering the use edge. The
    /// expression type starts as the variable's current declared type.
    pub fn variable_expression(&mut self, variable: VariableId) -> Result<NodeId> {
        let expression_type = Some(self.variables[variable.index()].declared_type().clone());
        let id = self
            .arena
            .alloc(CilNode::VariableExpression(CilVariableExpression {
                variable,
                expression_type,
            }))?;
        self.variables[variable.index()].used_by.insert(id);
        Ok(id)
    }

    /// Appends a statement to a block.
    ///
    /// # Errors
    ///
    /// Fails when `block` is not a block node or `statement` is already attached.
    pub fn push_statement(&mut self, block: NodeId, statement: NodeId) -> Result<()> {
        if !matches!(self.arena.payload(block), CilNode::Block(_)) {
            return Err(Error::Error(
                "statements can only be attached to blocks".to_string(),
            ));
        }
        self.arena.attach_with(block, statement, |payload| {
            if let CilNode::Block(b) = payload {
                b.statements.push(statement);
            }
        })
    }

    /// Inserts a statement into a block at `index`.
    ///
    /// # Errors
    ///
    /// Fails when `block` is not a block node, the index is out of range, or
    /// `statement` is already attached.
    pub fn insert_statement(
        &mut self,
        block: NodeId,
        index: usize,
        statement: NodeId,
    ) -> Result<()> {
        match self.arena.payload(block) {
            CilNode::Block(b) if index <= b.statements.len() => {}
            CilNode::Block(_) => {
                return Err(Error::Error(format!(
                    "statement index {index} out of range"
                )))
            }
            _ => {
                return Err(Error::Error(
                    "statements can only be attached to blocks".to_string(),
                ))
            }
        }
        self.arena.attach_with(block, statement, |payload| {
            if let CilNode::Block(b) = payload {
                b.statements.insert(index, statement);
            }
        })
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Detaches a node from its parent for reattachment elsewhere.
    ///
    /// Definition/use registrations of the subtree are kept; use
    /// [`discard`](Self::discard) when the subtree will not return to the unit.
    ///
    /// # Errors
    ///
    /// [`Error::NotAMember`] when the node has no parent.
    pub fn detach(&mut self, node: NodeId) -> Result<NodeId> {
        self.arena.remove(node)
    }

    /// Reattaches a detached expression into the argument slot `old` occupied, or
    /// generally substitutes `new` for `old`, unregistering `old`'s subtree.
    ///
    /// # Errors
    ///
    /// [`Error::NotAMember`] when `old` has no parent, [`Error::AlreadyAttached`] when
    /// `new` still has one.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        self.arena.replace(old, new)?;
        self.unregister_subtree(old);
        Ok(())
    }

    /// Removes a node from its tree (when attached) and unregisters every
    /// definition/use edge in its subtree.
    ///
    /// # Errors
    ///
    /// Propagates structural failures from the detach.
    pub fn discard(&mut self, node: NodeId) -> Result<()> {
        if self.arena.parent(node).is_some() {
            self.arena.remove(node)?;
        }
        self.unregister_subtree(node);
        Ok(())
    }

    fn unregister_subtree(&mut self, root: NodeId) {
        for id in self.arena.descendants(root) {
            match self.arena.payload(id) {
                CilNode::Assignment(assignment) => {
                    let variable = assignment.variable;
                    self.variables[variable.index()].assigned_by.remove(&id);
                }
                CilNode::VariableExpression(expr) => {
                    let variable = expr.variable;
                    self.variables[variable.index()].used_by.remove(&id);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::cil::CilNodeKind;

    fn object() -> TypeRef {
        TypeRef::named("System", "Object")
    }

    fn int32() -> TypeRef {
        TypeRef::named("System", "Int32")
    }

    #[test]
    fn construction_registers_def_use_edges() {
        let mut unit = CilUnit::new();
        let var = unit.new_variable("loc_0", int32());

        let value = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(7)), vec![], Some(int32()))
            .unwrap();
        let assign = unit.assignment(var, value).unwrap();
        let read = unit.variable_expression(var).unwrap();
        let stmt = unit.expression_statement(read).unwrap();
        let block = unit.new_block(CfgNodeId::new(0), vec![assign, stmt]).unwrap();

        assert!(unit.variable(var).assigned_by().contains(&assign));
        assert!(unit.variable(var).used_by().contains(&read));
        assert_eq!(unit.block(CfgNodeId::new(0)), Some(block));
        assert_eq!(unit.arena().root_container(value).unwrap(), CfgNodeId::new(0));
    }

    #[test]
    fn discard_unregisters_subtree() {
        let mut unit = CilUnit::new();
        let var = unit.new_variable("loc_0", int32());

        let value = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(7)), vec![], Some(int32()))
            .unwrap();
        let assign = unit.assignment(var, value).unwrap();
        let _block = unit.new_block(CfgNodeId::new(0), vec![assign]).unwrap();

        unit.discard(assign).unwrap();
        assert!(unit.variable(var).assigned_by().is_empty());
        assert_eq!(unit.arena().parent(assign), None);
    }

    #[test]
    fn detach_keeps_registrations_for_reattachment() {
        let mut unit = CilUnit::new();
        let var = unit.new_variable("loc_0", int32());

        let read = unit.variable_expression(var).unwrap();
        let stmt = unit.expression_statement(read).unwrap();
        let block = unit.new_block(CfgNodeId::new(0), vec![stmt]).unwrap();

        let detached = unit.detach(stmt).unwrap();
        assert!(unit.variable(var).used_by().contains(&read));

        unit.push_statement(block, detached).unwrap();
        assert_eq!(unit.arena().parent(stmt), Some(block));
    }

    #[test]
    fn replace_unregisters_replaced_subtree() {
        let mut unit = CilUnit::new();
        let var = unit.new_variable("loc_0", int32());

        let read = unit.variable_expression(var).unwrap();
        let stmt = unit.expression_statement(read).unwrap();
        let _block = unit.new_block(CfgNodeId::new(0), vec![stmt]).unwrap();

        let constant = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(1)), vec![], Some(int32()))
            .unwrap();
        unit.replace(read, constant).unwrap();

        assert!(unit.variable(var).used_by().is_empty());
        match unit.node(stmt) {
            CilNode::ExpressionStatement(s) => assert_eq!(s.expression, Some(constant)),
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn retype_variable_rewrites_uses() {
        let mut unit = CilUnit::new();
        let var = unit.new_variable("loc_0", object());
        let read_a = unit.variable_expression(var).unwrap();
        let read_b = unit.variable_expression(var).unwrap();

        unit.retype_variable(var, int32());

        assert_eq!(unit.variable(var).declared_type(), &int32());
        for read in [read_a, read_b] {
            assert_eq!(unit.node(read).expression_type(), Some(&int32()));
        }
    }

    #[test]
    fn insert_statement_respects_order() {
        let mut unit = CilUnit::new();
        let var = unit.new_variable("loc_0", int32());

        let first = unit
            .instruction(CilOp::Ldc, Some(CilOperand::Int(1)), vec![], Some(int32()))
            .unwrap();
        let assign = unit.assignment(var, first).unwrap();
        let block = unit.new_block(CfgNodeId::new(0), vec![assign]).unwrap();

        let nop = unit.instruction(CilOp::Nop, None, vec![], None).unwrap();
        let stmt = unit.expression_statement(nop).unwrap();
        unit.insert_statement(block, 0, stmt).unwrap();

        assert_eq!(unit.arena().children(block), vec![stmt, assign]);
        assert!(unit.insert_statement(block, 5, stmt).is_err());
    }

    #[test]
    fn duplicate_block_for_cfg_node_fails() {
        let mut unit = CilUnit::new();
        unit.new_block(CfgNodeId::new(3), vec![]).unwrap();
        assert!(unit.new_block(CfgNodeId::new(3), vec![]).is_err());
    }

    #[test]
    fn kind_dispatch_is_stable() {
        let mut unit = CilUnit::new();
        let var = unit.new_variable("loc_0", int32());
        let read = unit.variable_expression(var).unwrap();
        assert_eq!(unit.node(read).kind(), CilNodeKind::VariableExpression);
    }
}
