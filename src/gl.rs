// Copyright (c) 2023 Jonathan "Razordor" Alan Thomason

//! The OpenGL registry: core features `GL_VERSION_1_0` through `GL_VERSION_4_6`,
//! followed by the compatibility-profile commands in `GL_VERSION_*_COMPAT` features.
//!
//! A loader over the whole registry needs a compatibility context with GL 4.6. Use
//! [`LoaderBuilder::up_to`](crate::LoaderBuilder::up_to) with a core version to load
//! only what a core context of that version provides.
//!
//! Each command is a [`SymbolId`](crate::SymbolId) constant named after the entry
//! point, and each version is a [`FeatureId`](crate::FeatureId) constant.
#![allow(non_upper_case_globals)]

crate::registry! {
	GL_VERSION_1_0 {
		glCullFace, glFrontFace, glHint, glLineWidth, glPointSize, glPolygonMode,
		glScissor, glTexParameterf, glTexParameterfv, glTexParameteri, glTexParameteriv,
		glTexImage1D, glTexImage2D, glDrawBuffer, glClear, glClearColor, glClearStencil,
		glClearDepth, glStencilMask, glColorMask, glDepthMask, glDisable, glEnable,
		glFinish, glFlush, glBlendFunc, glLogicOp, glStencilFunc, glStencilOp,
		glDepthFunc, glPixelStoref, glPixelStorei, glReadBuffer, glReadPixels,
		glGetBooleanv, glGetDoublev, glGetError, glGetFloatv, glGetIntegerv,
		glGetString, glGetTexImage, glGetTexParameterfv, glGetTexParameteriv,
		glGetTexLevelParameterfv, glGetTexLevelParameteriv, glIsEnabled, glDepthRange,
		glViewport,
	}
	GL_VERSION_1_1 {
		glDrawArrays, glDrawElements, glGetPointerv, glPolygonOffset, glCopyTexImage1D,
		glCopyTexImage2D, glCopyTexSubImage1D, glCopyTexSubImage2D, glTexSubImage1D,
		glTexSubImage2D, glBindTexture, glDeleteTextures, glGenTextures, glIsTexture,
	}
	GL_VERSION_1_2 {
		glDrawRangeElements, glTexImage3D, glTexSubImage3D, glCopyTexSubImage3D,
	}
	GL_VERSION_1_3 {
		glActiveTexture, glSampleCoverage, glCompressedTexImage3D, glCompressedTexImage2D,
		glCompressedTexImage1D, glCompressedTexSubImage3D, glCompressedTexSubImage2D,
		glCompressedTexSubImage1D, glGetCompressedTexImage,
	}
	GL_VERSION_1_4 {
		glBlendFuncSeparate, glMultiDrawArrays, glMultiDrawElements, glPointParameterf,
		glPointParameterfv, glPointParameteri, glPointParameteriv, glBlendColor,
		glBlendEquation,
	}
	GL_VERSION_1_5 {
		glGenQueries, glDeleteQueries, glIsQuery, glBeginQuery, glEndQuery, glGetQueryiv,
		glGetQueryObjectiv, glGetQueryObjectuiv, glBindBuffer, glDeleteBuffers,
		glGenBuffers, glIsBuffer, glBufferData, glBufferSubData, glGetBufferSubData,
		glMapBuffer, glUnmapBuffer, glGetBufferParameteriv, glGetBufferPointerv,
	}
	GL_VERSION_2_0 {
		glBlendEquationSeparate, glDrawBuffers, glStencilOpSeparate, glStencilFuncSeparate,
		glStencilMaskSeparate, glAttachShader, glBindAttribLocation, glCompileShader,
		glCreateProgram, glCreateShader, glDeleteProgram, glDeleteShader, glDetachShader,
		glDisableVertexAttribArray, glEnableVertexAttribArray, glGetActiveAttrib,
		glGetActiveUniform, glGetAttachedShaders, glGetAttribLocation, glGetProgramiv,
		glGetProgramInfoLog, glGetShaderiv, glGetShaderInfoLog, glGetShaderSource,
		glGetUniformLocation, glGetUniformfv, glGetUniformiv, glGetVertexAttribdv,
		glGetVertexAttribfv, glGetVertexAttribiv, glGetVertexAttribPointerv, glIsProgram,
		glIsShader, glLinkProgram, glShaderSource, glUseProgram, glUniform1f, glUniform2f,
		glUniform3f, glUniform4f, glUniform1i, glUniform2i, glUniform3i, glUniform4i,
		glUniform1fv, glUniform2fv, glUniform3fv, glUniform4fv, glUniform1iv, glUniform2iv,
		glUniform3iv, glUniform4iv, glUniformMatrix2fv, glUniformMatrix3fv,
		glUniformMatrix4fv, glValidateProgram, glVertexAttrib1d, glVertexAttrib1dv,
		glVertexAttrib1f, glVertexAttrib1fv, glVertexAttrib1s, glVertexAttrib1sv,
		glVertexAttrib2d, glVertexAttrib2dv, glVertexAttrib2f, glVertexAttrib2fv,
		glVertexAttrib2s, glVertexAttrib2sv, glVertexAttrib3d, glVertexAttrib3dv,
		glVertexAttrib3f, glVertexAttrib3fv, glVertexAttrib3s, glVertexAttrib3sv,
		glVertexAttrib4Nbv, glVertexAttrib4Niv, glVertexAttrib4Nsv, glVertexAttrib4Nub,
		glVertexAttrib4Nubv, glVertexAttrib4Nuiv, glVertexAttrib4Nusv, glVertexAttrib4bv,
		glVertexAttrib4d, glVertexAttrib4dv, glVertexAttrib4f, glVertexAttrib4fv,
		glVertexAttrib4iv, glVertexAttrib4s, glVertexAttrib4sv, glVertexAttrib4ubv,
		glVertexAttrib4uiv, glVertexAttrib4usv, glVertexAttribPointer,
	}
	GL_VERSION_2_1 {
		glUniformMatrix2x3fv, glUniformMatrix3x2fv, glUniformMatrix2x4fv,
		glUniformMatrix4x2fv, glUniformMatrix3x4fv, glUniformMatrix4x3fv,
	}
	GL_VERSION_3_0 {
		glColorMaski, glGetBooleani_v, glGetIntegeri_v, glEnablei, glDisablei,
		glIsEnabledi, glBeginTransformFeedback, glEndTransformFeedback, glBindBufferRange,
		glBindBufferBase, glTransformFeedbackVaryings, glGetTransformFeedbackVarying,
		glClampColor, glBeginConditionalRender, glEndConditionalRender,
		glVertexAttribIPointer, glGetVertexAttribIiv, glGetVertexAttribIuiv,
		glVertexAttribI1i, glVertexAttribI2i, glVertexAttribI3i, glVertexAttribI4i,
		glVertexAttribI1ui, glVertexAttribI2ui, glVertexAttribI3ui, glVertexAttribI4ui,
		glVertexAttribI1iv, glVertexAttribI2iv, glVertexAttribI3iv, glVertexAttribI4iv,
		glVertexAttribI1uiv, glVertexAttribI2uiv, glVertexAttribI3uiv, glVertexAttribI4uiv,
		glVertexAttribI4bv, glVertexAttribI4sv, glVertexAttribI4ubv, glVertexAttribI4usv,
		glGetUniformuiv, glBindFragDataLocation, glGetFragDataLocation, glUniform1ui,
		glUniform2ui, glUniform3ui, glUniform4ui, glUniform1uiv, glUniform2uiv,
		glUniform3uiv, glUniform4uiv, glTexParameterIiv, glTexParameterIuiv,
		glGetTexParameterIiv, glGetTexParameterIuiv, glClearBufferiv, glClearBufferuiv,
		glClearBufferfv, glClearBufferfi, glGetStringi, glIsRenderbuffer,
		glBindRenderbuffer, glDeleteRenderbuffers, glGenRenderbuffers,
		glRenderbufferStorage, glGetRenderbufferParameteriv, glIsFramebuffer,
		glBindFramebuffer, glDeleteFramebuffers, glGenFramebuffers,
		glCheckFramebufferStatus, glFramebufferTexture1D, glFramebufferTexture2D,
		glFramebufferTexture3D, glFramebufferRenderbuffer,
		glGetFramebufferAttachmentParameteriv, glGenerateMipmap, glBlitFramebuffer,
		glRenderbufferStorageMultisample, glFramebufferTextureLayer, glMapBufferRange,
		glFlushMappedBufferRange, glBindVertexArray, glDeleteVertexArrays,
		glGenVertexArrays, glIsVertexArray,
	}
	GL_VERSION_3_1 {
		glDrawArraysInstanced, glDrawElementsInstanced, glTexBuffer,
		glPrimitiveRestartIndex, glCopyBufferSubData, glGetUniformIndices,
		glGetActiveUniformsiv, glGetActiveUniformName, glGetUniformBlockIndex,
		glGetActiveUniformBlockiv, glGetActiveUniformBlockName, glUniformBlockBinding,
	}
	GL_VERSION_3_2 {
		glDrawElementsBaseVertex, glDrawRangeElementsBaseVertex,
		glDrawElementsInstancedBaseVertex, glMultiDrawElementsBaseVertex,
		glProvokingVertex, glFenceSync, glIsSync, glDeleteSync, glClientWaitSync,
		glWaitSync, glGetInteger64v, glGetSynciv, glGetInteger64i_v,
		glGetBufferParameteri64v, glFramebufferTexture, glTexImage2DMultisample,
		glTexImage3DMultisample, glGetMultisamplefv, glSampleMaski,
	}
	GL_VERSION_3_3 {
		glBindFragDataLocationIndexed, glGetFragDataIndex, glGenSamplers,
		glDeleteSamplers, glIsSampler, glBindSampler, glSamplerParameteri,
		glSamplerParameteriv, glSamplerParameterf, glSamplerParameterfv,
		glSamplerParameterIiv, glSamplerParameterIuiv, glGetSamplerParameteriv,
		glGetSamplerParameterIiv, glGetSamplerParameterfv, glGetSamplerParameterIuiv,
		glQueryCounter, glGetQueryObjecti64v, glGetQueryObjectui64v,
		glVertexAttribDivisor, glVertexAttribP1ui, glVertexAttribP1uiv,
		glVertexAttribP2ui, glVertexAttribP2uiv, glVertexAttribP3ui, glVertexAttribP3uiv,
		glVertexAttribP4ui, glVertexAttribP4uiv,
	}
	GL_VERSION_4_0 {
		glMinSampleShading, glBlendEquationi, glBlendEquationSeparatei, glBlendFunci,
		glBlendFuncSeparatei, glDrawArraysIndirect, glDrawElementsIndirect, glUniform1d,
		glUniform2d, glUniform3d, glUniform4d, glUniform1dv, glUniform2dv, glUniform3dv,
		glUniform4dv, glUniformMatrix2dv, glUniformMatrix3dv, glUniformMatrix4dv,
		glUniformMatrix2x3dv, glUniformMatrix2x4dv, glUniformMatrix3x2dv,
		glUniformMatrix3x4dv, glUniformMatrix4x2dv, glUniformMatrix4x3dv, glGetUniformdv,
		glGetSubroutineUniformLocation, glGetSubroutineIndex, glGetActiveSubroutineUniformiv,
		glGetActiveSubroutineUniformName, glGetActiveSubroutineName, glUniformSubroutinesuiv,
		glGetUniformSubroutineuiv, glGetProgramStageiv, glPatchParameteri, glPatchParameterfv,
		glBindTransformFeedback, glDeleteTransformFeedbacks, glGenTransformFeedbacks,
		glIsTransformFeedback, glPauseTransformFeedback, glResumeTransformFeedback,
		glDrawTransformFeedback, glDrawTransformFeedbackStream, glBeginQueryIndexed,
		glEndQueryIndexed, glGetQueryIndexediv,
	}
	GL_VERSION_4_1 {
		glReleaseShaderCompiler, glShaderBinary, glGetShaderPrecisionFormat, glDepthRangef,
		glClearDepthf, glGetProgramBinary, glProgramBinary, glProgramParameteri,
		glUseProgramStages, glActiveShaderProgram, glCreateShaderProgramv,
		glBindProgramPipeline, glDeleteProgramPipelines, glGenProgramPipelines,
		glIsProgramPipeline, glGetProgramPipelineiv, glProgramUniform1i, glProgramUniform1iv,
		glProgramUniform1f, glProgramUniform1fv, glProgramUniform1d, glProgramUniform1dv,
		glProgramUniform1ui, glProgramUniform1uiv, glProgramUniform2i, glProgramUniform2iv,
		glProgramUniform2f, glProgramUniform2fv, glProgramUniform2d, glProgramUniform2dv,
		glProgramUniform2ui, glProgramUniform2uiv, glProgramUniform3i, glProgramUniform3iv,
		glProgramUniform3f, glProgramUniform3fv, glProgramUniform3d, glProgramUniform3dv,
		glProgramUniform3ui, glProgramUniform3uiv, glProgramUniform4i, glProgramUniform4iv,
		glProgramUniform4f, glProgramUniform4fv, glProgramUniform4d, glProgramUniform4dv,
		glProgramUniform4ui, glProgramUniform4uiv, glProgramUniformMatrix2fv,
		glProgramUniformMatrix3fv, glProgramUniformMatrix4fv, glProgramUniformMatrix2x3fv,
		glProgramUniformMatrix3x2fv, glProgramUniformMatrix2x4fv, glProgramUniformMatrix4x2fv,
		glProgramUniformMatrix3x4fv, glProgramUniformMatrix4x3fv, glProgramUniformMatrix2dv,
		glProgramUniformMatrix3dv, glProgramUniformMatrix4dv, glProgramUniformMatrix2x3dv,
		glProgramUniformMatrix3x2dv, glProgramUniformMatrix2x4dv, glProgramUniformMatrix4x2dv,
		glProgramUniformMatrix3x4dv, glProgramUniformMatrix4x3dv, glValidateProgramPipeline,
		glGetProgramPipelineInfoLog, glVertexAttribL1d, glVertexAttribL2d, glVertexAttribL3d,
		glVertexAttribL4d, glVertexAttribL1dv, glVertexAttribL2dv, glVertexAttribL3dv,
		glVertexAttribL4dv, glVertexAttribLPointer, glGetVertexAttribLdv, glViewportArrayv,
		glViewportIndexedf, glViewportIndexedfv, glScissorArrayv, glScissorIndexed,
		glScissorIndexedv, glDepthRangeArrayv, glDepthRangeIndexed, glGetFloati_v,
		glGetDoublei_v,
	}
	GL_VERSION_4_2 {
		glDrawArraysInstancedBaseInstance, glDrawElementsInstancedBaseInstance,
		glDrawElementsInstancedBaseVertexBaseInstance, glGetInternalformativ,
		glGetActiveAtomicCounterBufferiv, glBindImageTexture, glMemoryBarrier, glTexStorage1D,
		glTexStorage2D, glTexStorage3D, glDrawTransformFeedbackInstanced,
		glDrawTransformFeedbackStreamInstanced,
	}
	GL_VERSION_4_3 {
		glClearBufferData, glClearBufferSubData, glDispatchCompute, glDispatchComputeIndirect,
		glCopyImageSubData, glFramebufferParameteri, glGetFramebufferParameteriv,
		glGetInternalformati64v, glInvalidateTexSubImage, glInvalidateTexImage,
		glInvalidateBufferSubData, glInvalidateBufferData, glInvalidateFramebuffer,
		glInvalidateSubFramebuffer, glMultiDrawArraysIndirect, glMultiDrawElementsIndirect,
		glGetProgramInterfaceiv, glGetProgramResourceIndex, glGetProgramResourceName,
		glGetProgramResourceiv, glGetProgramResourceLocation,
		glGetProgramResourceLocationIndex, glShaderStorageBlockBinding, glTexBufferRange,
		glTexStorage2DMultisample, glTexStorage3DMultisample, glTextureView,
		glBindVertexBuffer, glVertexAttribFormat, glVertexAttribIFormat,
		glVertexAttribLFormat, glVertexAttribBinding, glVertexBindingDivisor,
		glDebugMessageControl, glDebugMessageInsert, glDebugMessageCallback,
		glGetDebugMessageLog, glPushDebugGroup, glPopDebugGroup, glObjectLabel,
		glGetObjectLabel, glObjectPtrLabel, glGetObjectPtrLabel,
	}
	GL_VERSION_4_4 {
		glBufferStorage, glClearTexImage, glClearTexSubImage, glBindBuffersBase,
		glBindBuffersRange, glBindTextures, glBindSamplers, glBindImageTextures,
		glBindVertexBuffers,
	}
	GL_VERSION_4_5 {
		glClipControl, glCreateTransformFeedbacks, glTransformFeedbackBufferBase,
		glTransformFeedbackBufferRange, glGetTransformFeedbackiv, glGetTransformFeedbacki_v,
		glGetTransformFeedbacki64_v, glCreateBuffers, glNamedBufferStorage, glNamedBufferData,
		glNamedBufferSubData, glCopyNamedBufferSubData, glClearNamedBufferData,
		glClearNamedBufferSubData, glMapNamedBuffer, glMapNamedBufferRange,
		glUnmapNamedBuffer, glFlushMappedNamedBufferRange, glGetNamedBufferParameteriv,
		glGetNamedBufferParameteri64v, glGetNamedBufferPointerv, glGetNamedBufferSubData,
		glCreateFramebuffers, glNamedFramebufferRenderbuffer, glNamedFramebufferParameteri,
		glNamedFramebufferTexture, glNamedFramebufferTextureLayer,
		glNamedFramebufferDrawBuffer, glNamedFramebufferDrawBuffers,
		glNamedFramebufferReadBuffer, glInvalidateNamedFramebufferData,
		glInvalidateNamedFramebufferSubData, glClearNamedFramebufferiv,
		glClearNamedFramebufferuiv, glClearNamedFramebufferfv, glClearNamedFramebufferfi,
		glBlitNamedFramebuffer, glCheckNamedFramebufferStatus,
		glGetNamedFramebufferParameteriv, glGetNamedFramebufferAttachmentParameteriv,
		glCreateRenderbuffers, glNamedRenderbufferStorage,
		glNamedRenderbufferStorageMultisample, glGetNamedRenderbufferParameteriv,
		glCreateTextures, glTextureBuffer, glTextureBufferRange, glTextureStorage1D,
		glTextureStorage2D, glTextureStorage3D, glTextureStorage2DMultisample,
		glTextureStorage3DMultisample, glTextureSubImage1D, glTextureSubImage2D,
		glTextureSubImage3D, glCompressedTextureSubImage1D, glCompressedTextureSubImage2D,
		glCompressedTextureSubImage3D, glCopyTextureSubImage1D, glCopyTextureSubImage2D,
		glCopyTextureSubImage3D, glTextureParameterf, glTextureParameterfv,
		glTextureParameteri, glTextureParameterIiv, glTextureParameterIuiv,
		glTextureParameteriv, glGenerateTextureMipmap, glBindTextureUnit, glGetTextureImage,
		glGetCompressedTextureImage, glGetTextureLevelParameterfv,
		glGetTextureLevelParameteriv, glGetTextureParameterfv, glGetTextureParameterIiv,
		glGetTextureParameterIuiv, glGetTextureParameteriv, glCreateVertexArrays,
		glDisableVertexArrayAttrib, glEnableVertexArrayAttrib, glVertexArrayElementBuffer,
		glVertexArrayVertexBuffer, glVertexArrayVertexBuffers, glVertexArrayAttribBinding,
		glVertexArrayAttribFormat, glVertexArrayAttribIFormat, glVertexArrayAttribLFormat,
		glVertexArrayBindingDivisor, glGetVertexArrayiv, glGetVertexArrayIndexediv,
		glGetVertexArrayIndexed64iv, glCreateSamplers, glCreateProgramPipelines,
		glCreateQueries, glGetQueryBufferObjecti64v, glGetQueryBufferObjectiv,
		glGetQueryBufferObjectui64v, glGetQueryBufferObjectuiv, glMemoryBarrierByRegion,
		glGetTextureSubImage, glGetCompressedTextureSubImage, glGetGraphicsResetStatus,
		glGetnCompressedTexImage, glGetnTexImage, glGetnUniformdv, glGetnUniformfv,
		glGetnUniformiv, glGetnUniformuiv, glReadnPixels, glTextureBarrier,
	}
	GL_VERSION_4_6 {
		glSpecializeShader, glMultiDrawArraysIndirectCount, glMultiDrawElementsIndirectCount,
		glPolygonOffsetClamp,
	}
	// Commands removed from the core profile. They sit after every core
	// feature, so `up_to` a core version never includes them.
	GL_VERSION_1_0_COMPAT {
		glNewList, glEndList, glCallList, glCallLists, glListBase, glBegin, glBitmap,
		glColor3b, glColor3bv, glColor3d, glColor3dv, glColor3f, glColor3fv, glColor3i,
		glColor3iv, glColor3s, glColor3sv, glColor3ub, glColor3ubv, glColor3ui, glColor3uiv,
		glColor3us, glColor3usv, glColor4b, glColor4bv, glColor4d, glColor4dv, glColor4f,
		glColor4fv, glColor4i, glColor4iv, glColor4s, glColor4sv, glColor4ub, glColor4ubv,
		glColor4ui, glColor4uiv, glColor4us, glColor4usv, glEdgeFlag, glEdgeFlagv, glEnd,
		glIndexd, glIndexdv, glIndexf, glIndexfv, glIndexi, glIndexiv, glIndexs, glIndexsv,
		glNormal3b, glNormal3bv, glNormal3d, glNormal3dv, glNormal3f, glNormal3fv, glNormal3i,
		glNormal3iv, glNormal3s, glNormal3sv, glRasterPos2d, glRasterPos2dv, glRasterPos2f,
		glRasterPos2fv, glRasterPos2i, glRasterPos2iv, glRasterPos2s, glRasterPos2sv,
		glRasterPos3d, glRasterPos3dv, glRasterPos3f, glRasterPos3fv, glRasterPos3i,
		glRasterPos3iv, glRasterPos3s, glRasterPos3sv, glRasterPos4d, glRasterPos4dv,
		glRasterPos4f, glRasterPos4fv, glRasterPos4i, glRasterPos4iv, glRasterPos4s,
		glRasterPos4sv, glRectd, glRectdv, glRectf, glRectfv, glRecti, glRectiv, glRects,
		glRectsv, glTexCoord1d, glTexCoord1dv, glTexCoord1f, glTexCoord1fv, glTexCoord1i,
		glTexCoord1iv, glTexCoord1s, glTexCoord1sv, glTexCoord2d, glTexCoord2dv, glTexCoord2f,
		glTexCoord2fv, glTexCoord2i, glTexCoord2iv, glTexCoord2s, glTexCoord2sv, glTexCoord3d,
		glTexCoord3dv, glTexCoord3f, glTexCoord3fv, glTexCoord3i, glTexCoord3iv, glTexCoord3s,
		glTexCoord3sv, glTexCoord4d, glTexCoord4dv, glTexCoord4f, glTexCoord4fv, glTexCoord4i,
		glTexCoord4iv, glTexCoord4s, glTexCoord4sv, glVertex2d, glVertex2dv, glVertex2f,
		glVertex2fv, glVertex2i, glVertex2iv, glVertex2s, glVertex2sv, glVertex3d,
		glVertex3dv, glVertex3f, glVertex3fv, glVertex3i, glVertex3iv, glVertex3s,
		glVertex3sv, glVertex4d, glVertex4dv, glVertex4f, glVertex4fv, glVertex4i,
		glVertex4iv, glVertex4s, glVertex4sv, glClipPlane, glColorMaterial, glFogf, glFogfv,
		glFogi, glFogiv, glLightf, glLightfv, glLighti, glLightiv, glLightModelf,
		glLightModelfv, glLightModeli, glLightModeliv, glLineStipple, glMaterialf,
		glMaterialfv, glMateriali, glMaterialiv, glPolygonStipple, glShadeModel, glTexEnvf,
		glTexEnvfv, glTexEnvi, glTexEnviv, glTexGend, glTexGendv, glTexGenf, glTexGenfv,
		glTexGeni, glTexGeniv, glFeedbackBuffer, glSelectBuffer, glRenderMode, glInitNames,
		glLoadName, glPassThrough, glPopName, glPushName, glClearAccum, glClearIndex,
		glIndexMask, glAccum, glPopAttrib, glPushAttrib, glMap1d, glMap1f, glMap2d, glMap2f,
		glMapGrid1d, glMapGrid1f, glMapGrid2d, glMapGrid2f, glEvalCoord1d, glEvalCoord1dv,
		glEvalCoord1f, glEvalCoord1fv, glEvalCoord2d, glEvalCoord2dv, glEvalCoord2f,
		glEvalCoord2fv, glEvalMesh1, glEvalPoint1, glEvalMesh2, glEvalPoint2, glAlphaFunc,
		glPixelZoom, glPixelTransferf, glPixelTransferi, glPixelMapfv, glPixelMapuiv,
		glPixelMapusv, glCopyPixels, glDrawPixels, glGetClipPlane, glGetLightfv, glGetLightiv,
		glGetMapdv, glGetMapfv, glGetMapiv, glGetMaterialfv, glGetMaterialiv, glGetPixelMapfv,
		glGetPixelMapuiv, glGetPixelMapusv, glGetPolygonStipple, glGetTexEnvfv, glGetTexEnviv,
		glGetTexGendv, glGetTexGenfv, glGetTexGeniv, glIsList, glFrustum, glLoadIdentity,
		glLoadMatrixf, glLoadMatrixd, glMatrixMode, glMultMatrixf, glMultMatrixd, glOrtho,
		glPopMatrix, glPushMatrix, glRotated, glRotatef, glScaled, glScalef, glTranslated,
		glTranslatef, glDeleteLists, glGenLists,
	}
	GL_VERSION_1_1_COMPAT {
		glArrayElement, glColorPointer, glDisableClientState, glEdgeFlagPointer,
		glEnableClientState, glIndexPointer, glInterleavedArrays, glNormalPointer,
		glTexCoordPointer, glVertexPointer, glAreTexturesResident, glPrioritizeTextures,
		glIndexub, glIndexubv, glPopClientAttrib, glPushClientAttrib,
	}
	GL_VERSION_1_3_COMPAT {
		glClientActiveTexture, glMultiTexCoord1d, glMultiTexCoord1dv, glMultiTexCoord1f,
		glMultiTexCoord1fv, glMultiTexCoord1i, glMultiTexCoord1iv, glMultiTexCoord1s,
		glMultiTexCoord1sv, glMultiTexCoord2d, glMultiTexCoord2dv, glMultiTexCoord2f,
		glMultiTexCoord2fv, glMultiTexCoord2i, glMultiTexCoord2iv, glMultiTexCoord2s,
		glMultiTexCoord2sv, glMultiTexCoord3d, glMultiTexCoord3dv, glMultiTexCoord3f,
		glMultiTexCoord3fv, glMultiTexCoord3i, glMultiTexCoord3iv, glMultiTexCoord3s,
		glMultiTexCoord3sv, glMultiTexCoord4d, glMultiTexCoord4dv, glMultiTexCoord4f,
		glMultiTexCoord4fv, glMultiTexCoord4i, glMultiTexCoord4iv, glMultiTexCoord4s,
		glMultiTexCoord4sv, glLoadTransposeMatrixf, glLoadTransposeMatrixd,
		glMultTransposeMatrixf, glMultTransposeMatrixd,
	}
	GL_VERSION_1_4_COMPAT {
		glFogCoordf, glFogCoordfv, glFogCoordd, glFogCoorddv, glFogCoordPointer,
		glSecondaryColor3b, glSecondaryColor3bv, glSecondaryColor3d, glSecondaryColor3dv,
		glSecondaryColor3f, glSecondaryColor3fv, glSecondaryColor3i, glSecondaryColor3iv,
		glSecondaryColor3s, glSecondaryColor3sv, glSecondaryColor3ub, glSecondaryColor3ubv,
		glSecondaryColor3ui, glSecondaryColor3uiv, glSecondaryColor3us, glSecondaryColor3usv,
		glSecondaryColorPointer, glWindowPos2d, glWindowPos2dv, glWindowPos2f, glWindowPos2fv,
		glWindowPos2i, glWindowPos2iv, glWindowPos2s, glWindowPos2sv, glWindowPos3d,
		glWindowPos3dv, glWindowPos3f, glWindowPos3fv, glWindowPos3i, glWindowPos3iv,
		glWindowPos3s, glWindowPos3sv,
	}
	GL_VERSION_4_5_COMPAT {
		glGetnMapdv, glGetnMapfv, glGetnMapiv, glGetnPixelMapfv, glGetnPixelMapuiv,
		glGetnPixelMapusv, glGetnPolygonStipple, glGetnColorTable, glGetnConvolutionFilter,
		glGetnSeparableFilter, glGetnHistogram, glGetnMinmax,
	}
}
